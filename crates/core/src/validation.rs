//! Checks for the slot invariants shared by the booking service and the stores.

use chrono::{DateTime, Utc};

use crate::errors::{ParkError, ParkResult};

pub fn check_slot_number(slot_number: i32) -> ParkResult<()> {
    if slot_number <= 0 {
        return Err(ParkError::Validation(format!(
            "slot number must be positive, got {}",
            slot_number
        )));
    }
    Ok(())
}

pub fn check_window(from: DateTime<Utc>, till: DateTime<Utc>) -> ParkResult<()> {
    if from > till {
        return Err(ParkError::InvalidWindow { from, till });
    }
    Ok(())
}

/// Validates a full occupancy state.
///
/// A booked slot must name its holder and an available slot must carry neither a
/// holder nor a window. Window bounds come in pairs.
pub fn check_state(
    is_available: bool,
    booked_by: Option<&str>,
    valid_from: Option<DateTime<Utc>>,
    valid_till: Option<DateTime<Utc>>,
) -> ParkResult<()> {
    if is_available {
        if booked_by.is_some() {
            return Err(ParkError::Validation(
                "an available slot cannot have booked_by".to_string(),
            ));
        }
        if valid_from.is_some() || valid_till.is_some() {
            return Err(ParkError::Validation(
                "an available slot cannot have a validity window".to_string(),
            ));
        }
        return Ok(());
    }

    match booked_by {
        Some(user) if !user.trim().is_empty() => {}
        _ => {
            return Err(ParkError::Validation(
                "a booked slot requires booked_by".to_string(),
            ));
        }
    }

    match (valid_from, valid_till) {
        (Some(from), Some(till)) => check_window(from, till),
        (None, None) => Ok(()),
        _ => Err(ParkError::Validation(
            "valid_from and valid_till must be set together".to_string(),
        )),
    }
}

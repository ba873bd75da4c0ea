use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single numbered parking space and its occupancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSlot {
    pub id: Uuid,
    pub slot_number: i32,
    pub is_available: bool,
    pub booked_by: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ParkingSlot {
    pub fn is_booked(&self) -> bool {
        !self.is_available
    }
}

/// Occupancy a slot is created with or moved into.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Available,
    Booked(Booking),
}

/// Who holds a slot and for which window.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub user_id: String,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
}

/// Partial update applied by a store.
///
/// Outer `None` leaves the column untouched; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotPatch {
    pub is_available: Option<bool>,
    pub booked_by: Option<Option<String>>,
    pub valid_from: Option<Option<DateTime<Utc>>>,
    pub valid_till: Option<Option<DateTime<Utc>>>,
}

impl SlotPatch {
    /// Patch that returns a slot to the available state.
    pub fn release() -> Self {
        Self {
            is_available: Some(true),
            booked_by: Some(None),
            valid_from: Some(None),
            valid_till: Some(None),
        }
    }

    /// Patch that overwrites every mutable column with the given slot's values.
    pub fn replace_with(slot: &ParkingSlot) -> Self {
        Self {
            is_available: Some(slot.is_available),
            booked_by: Some(slot.booked_by.clone()),
            valid_from: Some(slot.valid_from),
            valid_till: Some(slot.valid_till),
        }
    }

    pub fn apply(&self, slot: &mut ParkingSlot) {
        if let Some(is_available) = self.is_available {
            slot.is_available = is_available;
        }
        if let Some(booked_by) = &self.booked_by {
            slot.booked_by = booked_by.clone();
        }
        if let Some(valid_from) = self.valid_from {
            slot.valid_from = valid_from;
        }
        if let Some(valid_till) = self.valid_till {
            slot.valid_till = valid_till;
        }
    }
}

/// Listing filter; `None` returns every slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SlotFilter {
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSlot {
    pub slot_number: i32,
    #[serde(default = "default_available")]
    pub is_available: bool,
    pub booked_by: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotsRequest {
    pub slots: Vec<NewSlot>,
}

/// Administrative correction of availability or validity window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub is_available: Option<bool>,
    pub booked_by: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub valid_from: DateTime<Utc>,
    pub valid_till: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSlotResponse {
    pub message: String,
}

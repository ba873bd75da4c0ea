use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParkError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Slot number {0} already exists")]
    DuplicateSlotNumber(i32),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Invalid booking window: {from} is after {till}")]
    InvalidWindow {
        from: DateTime<Utc>,
        till: DateTime<Utc>,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type ParkResult<T> = Result<T, ParkError>;

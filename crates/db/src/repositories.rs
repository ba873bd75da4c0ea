pub mod parking_slot;
pub mod user;

//! # ParkSpot Core
//!
//! Domain types, storage traits and the booking rules for parking slots.

pub mod booking;
pub mod errors;
pub mod models;
pub mod store;
pub mod validation;

//! # Storage seams
//!
//! The booking service talks to persistence only through these traits so the
//! same rules run against PostgreSQL in production and against the in-memory
//! stores in tests.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::ParkResult,
    models::{
        slot::{Booking, ParkingSlot, SlotFilter, SlotPatch, SlotState},
        user::{Session, User},
    },
};

/// Record store for parking slots. Every method is atomic for a single record.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Fails with `DuplicateSlotNumber` when the number is taken.
    async fn create(&self, slot_number: i32, state: SlotState) -> ParkResult<ParkingSlot>;

    async fn get(&self, id: Uuid) -> ParkResult<ParkingSlot>;

    async fn get_by_slot_number(&self, slot_number: i32) -> ParkResult<ParkingSlot>;

    /// Slots matching the filter, ordered by slot number.
    async fn list(&self, filter: SlotFilter) -> ParkResult<Vec<ParkingSlot>>;

    async fn update(&self, id: Uuid, patch: SlotPatch) -> ParkResult<ParkingSlot>;

    /// Applies `patch` only while the slot's occupancy (availability, holder
    /// and window) still equals `expected`.
    ///
    /// Returns `None` when the slot is missing or has changed since it was read.
    async fn update_if(
        &self,
        id: Uuid,
        expected: ParkingSlot,
        patch: SlotPatch,
    ) -> ParkResult<Option<ParkingSlot>>;

    async fn delete(&self, id: Uuid) -> ParkResult<()>;

    /// Marks the slot booked only if it is still available.
    ///
    /// Returns `None` when the slot is missing or already booked; callers
    /// distinguish the two with a follow-up `get`.
    async fn book_if_available(&self, id: Uuid, booking: Booking)
    -> ParkResult<Option<ParkingSlot>>;

    /// Deletes the slot only if it is available. Returns whether a row was removed.
    async fn delete_if_available(&self, id: Uuid) -> ParkResult<bool>;
}

/// Users and login sessions.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fails with `Validation` when the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> ParkResult<User>;

    async fn find_user(&self, id: Uuid) -> ParkResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> ParkResult<Option<User>>;

    async fn create_session(&self, session: Session) -> ParkResult<Session>;

    async fn find_session(&self, token: &str) -> ParkResult<Option<Session>>;

    async fn delete_session(&self, token: &str) -> ParkResult<()>;
}

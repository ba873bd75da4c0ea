use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::Utc;
use eyre::eyre;
use uuid::Uuid;

use super::{IdentityStore, SlotStore};
use crate::{
    errors::{ParkError, ParkResult},
    models::{
        slot::{Booking, ParkingSlot, SlotFilter, SlotPatch, SlotState},
        user::{Session, User},
    },
};

fn read<T>(lock: &RwLock<T>) -> ParkResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| ParkError::StoreUnavailable(eyre!("store lock poisoned")))
}

fn write<T>(lock: &RwLock<T>) -> ParkResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| ParkError::StoreUnavailable(eyre!("store lock poisoned")))
}

fn slot_not_found(id: Uuid) -> ParkError {
    ParkError::NotFound(format!("Parking slot with ID {} not found", id))
}

fn same_occupancy(current: &ParkingSlot, expected: &ParkingSlot) -> bool {
    current.is_available == expected.is_available
        && current.booked_by == expected.booked_by
        && current.valid_from == expected.valid_from
        && current.valid_till == expected.valid_till
}

/// Process-local slot store. Conditional writes happen under one write lock.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RwLock<HashMap<Uuid, ParkingSlot>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn create(&self, slot_number: i32, state: SlotState) -> ParkResult<ParkingSlot> {
        let mut slots = write(&self.slots)?;
        if slots.values().any(|s| s.slot_number == slot_number) {
            return Err(ParkError::DuplicateSlotNumber(slot_number));
        }

        let mut slot = ParkingSlot {
            id: Uuid::new_v4(),
            slot_number,
            is_available: true,
            booked_by: None,
            valid_from: None,
            valid_till: None,
            created_at: Utc::now(),
        };
        if let SlotState::Booked(booking) = state {
            slot.is_available = false;
            slot.booked_by = Some(booking.user_id);
            slot.valid_from = booking.valid_from;
            slot.valid_till = booking.valid_till;
        }

        slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn get(&self, id: Uuid) -> ParkResult<ParkingSlot> {
        read(&self.slots)?
            .get(&id)
            .cloned()
            .ok_or_else(|| slot_not_found(id))
    }

    async fn get_by_slot_number(&self, slot_number: i32) -> ParkResult<ParkingSlot> {
        read(&self.slots)?
            .values()
            .find(|s| s.slot_number == slot_number)
            .cloned()
            .ok_or_else(|| {
                ParkError::NotFound(format!("Parking slot number {} not found", slot_number))
            })
    }

    async fn list(&self, filter: SlotFilter) -> ParkResult<Vec<ParkingSlot>> {
        let mut slots: Vec<ParkingSlot> = read(&self.slots)?
            .values()
            .filter(|s| filter.available.is_none_or(|a| s.is_available == a))
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.slot_number);
        Ok(slots)
    }

    async fn update(&self, id: Uuid, patch: SlotPatch) -> ParkResult<ParkingSlot> {
        let mut slots = write(&self.slots)?;
        let slot = slots.get_mut(&id).ok_or_else(|| slot_not_found(id))?;
        patch.apply(slot);
        Ok(slot.clone())
    }

    async fn update_if(
        &self,
        id: Uuid,
        expected: ParkingSlot,
        patch: SlotPatch,
    ) -> ParkResult<Option<ParkingSlot>> {
        let mut slots = write(&self.slots)?;
        match slots.get_mut(&id) {
            Some(slot) if same_occupancy(slot, &expected) => {
                patch.apply(slot);
                Ok(Some(slot.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> ParkResult<()> {
        write(&self.slots)?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| slot_not_found(id))
    }

    async fn book_if_available(
        &self,
        id: Uuid,
        booking: Booking,
    ) -> ParkResult<Option<ParkingSlot>> {
        let mut slots = write(&self.slots)?;
        match slots.get_mut(&id) {
            Some(slot) if slot.is_available => {
                slot.is_available = false;
                slot.booked_by = Some(booking.user_id);
                slot.valid_from = booking.valid_from;
                slot.valid_till = booking.valid_till;
                Ok(Some(slot.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_if_available(&self, id: Uuid) -> ParkResult<bool> {
        let mut slots = write(&self.slots)?;
        if slots.get(&id).is_some_and(|s| s.is_available) {
            slots.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    users: RwLock<HashMap<Uuid, User>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> ParkResult<User> {
        let mut users = write(&self.users)?;
        if users.values().any(|u| u.username == username) {
            return Err(ParkError::Validation(format!(
                "username {} is already taken",
                username
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> ParkResult<Option<User>> {
        Ok(read(&self.users)?.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> ParkResult<Option<User>> {
        Ok(read(&self.users)?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_session(&self, session: Session) -> ParkResult<Session> {
        let now = Utc::now();
        let mut sessions = write(&self.sessions)?;
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn find_session(&self, token: &str) -> ParkResult<Option<Session>> {
        Ok(read(&self.sessions)?.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> ParkResult<()> {
        write(&self.sessions)?.remove(token);
        Ok(())
    }
}

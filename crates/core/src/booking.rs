//! # Booking Service
//!
//! Enforces the slot lifecycle on top of a [`SlotStore`]. A slot is either
//! available or booked; `book` moves it to booked through the store's
//! compare-and-swap and `release` moves it back, idempotently.

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    errors::{ParkError, ParkResult},
    models::slot::{Booking, NewSlot, ParkingSlot, SlotFilter, SlotPatch, SlotState, UpdateSlotRequest},
    store::SlotStore,
    validation,
};

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn SlotStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Reserves an available slot for `user_id` over `[valid_from, valid_till]`.
    ///
    /// At most one of several concurrent callers for the same slot succeeds;
    /// the rest get `SlotUnavailable`.
    pub async fn book(
        &self,
        slot_id: Uuid,
        user_id: &str,
        valid_from: DateTime<Utc>,
        valid_till: DateTime<Utc>,
    ) -> ParkResult<ParkingSlot> {
        if let Err(err) = validation::check_window(valid_from, valid_till) {
            // A missing slot reports NotFound ahead of a malformed window.
            self.store.get(slot_id).await?;
            return Err(err);
        }
        if user_id.trim().is_empty() {
            return Err(ParkError::Validation("user id must not be empty".to_string()));
        }

        let booking = Booking {
            user_id: user_id.to_string(),
            valid_from: Some(valid_from),
            valid_till: Some(valid_till),
        };

        match self.store.book_if_available(slot_id, booking).await? {
            Some(slot) => {
                info!(slot_id = %slot.id, slot_number = slot.slot_number, user_id, "slot booked");
                Ok(slot)
            }
            None => {
                // Lost the guard: either the slot is gone or someone else holds it.
                let slot = self.store.get(slot_id).await?;
                debug!(slot_id = %slot.id, "booking rejected, slot already taken");
                Err(ParkError::SlotUnavailable(format!(
                    "slot {} is already booked",
                    slot.slot_number
                )))
            }
        }
    }

    pub async fn release(&self, slot_id: Uuid) -> ParkResult<ParkingSlot> {
        let slot = self.store.get(slot_id).await?;
        if slot.is_available {
            return Ok(slot);
        }

        let released = self.store.update(slot_id, SlotPatch::release()).await?;
        info!(slot_id = %released.id, slot_number = released.slot_number, "slot released");
        Ok(released)
    }

    pub async fn query_available(&self, is_available: bool) -> ParkResult<Vec<ParkingSlot>> {
        self.store
            .list(SlotFilter {
                available: Some(is_available),
            })
            .await
    }

    pub async fn list_slots(&self) -> ParkResult<Vec<ParkingSlot>> {
        self.store.list(SlotFilter::default()).await
    }

    pub async fn get_slot(&self, slot_id: Uuid) -> ParkResult<ParkingSlot> {
        self.store.get(slot_id).await
    }

    pub async fn get_slot_by_number(&self, slot_number: i32) -> ParkResult<ParkingSlot> {
        self.store.get_by_slot_number(slot_number).await
    }

    /// Creates a batch of slots. The whole batch is validated before any write.
    pub async fn create_slots(&self, slots: Vec<NewSlot>) -> ParkResult<Vec<ParkingSlot>> {
        if slots.is_empty() {
            return Err(ParkError::Validation(
                "at least one slot is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for slot in &slots {
            validation::check_slot_number(slot.slot_number)?;
            validation::check_state(
                slot.is_available,
                slot.booked_by.as_deref(),
                slot.valid_from,
                slot.valid_till,
            )?;
            if !seen.insert(slot.slot_number) {
                return Err(ParkError::DuplicateSlotNumber(slot.slot_number));
            }
        }

        let mut created = Vec::with_capacity(slots.len());
        for slot in slots {
            let state = if slot.is_available {
                SlotState::Available
            } else {
                SlotState::Booked(Booking {
                    // check_state guarantees a holder for booked slots
                    user_id: slot.booked_by.unwrap_or_default(),
                    valid_from: slot.valid_from,
                    valid_till: slot.valid_till,
                })
            };
            created.push(self.store.create(slot.slot_number, state).await?);
        }

        info!(count = created.len(), "parking slots created");
        Ok(created)
    }

    /// Administrative correction of a slot's availability or window.
    ///
    /// Requested fields are merged over the stored record; marking a slot
    /// available drops its holder and window. Fails with `SlotUnavailable` if
    /// the slot is booked or released between the read and the write.
    pub async fn update_slot(
        &self,
        slot_id: Uuid,
        request: UpdateSlotRequest,
    ) -> ParkResult<ParkingSlot> {
        let current = self.store.get(slot_id).await?;
        let mut merged = current.clone();

        if let Some(is_available) = request.is_available {
            merged.is_available = is_available;
        }
        if request.booked_by.is_some() {
            merged.booked_by = request.booked_by;
        }
        if request.valid_from.is_some() {
            merged.valid_from = request.valid_from;
        }
        if request.valid_till.is_some() {
            merged.valid_till = request.valid_till;
        }
        if merged.is_available {
            merged.booked_by = None;
            merged.valid_from = None;
            merged.valid_till = None;
        }

        validation::check_state(
            merged.is_available,
            merged.booked_by.as_deref(),
            merged.valid_from,
            merged.valid_till,
        )?;

        // The write only lands if nobody booked or released the slot since it was read.
        match self
            .store
            .update_if(slot_id, current, SlotPatch::replace_with(&merged))
            .await?
        {
            Some(updated) => {
                debug!(slot_id = %updated.id, "slot updated");
                Ok(updated)
            }
            None => {
                let slot = self.store.get(slot_id).await?;
                debug!(slot_id = %slot.id, "update rejected, slot changed concurrently");
                Err(ParkError::SlotUnavailable(format!(
                    "slot {} changed while being updated",
                    slot.slot_number
                )))
            }
        }
    }

    /// Deletes an available slot. Booked slots must be released first.
    pub async fn delete_slot(&self, slot_id: Uuid) -> ParkResult<()> {
        if self.store.delete_if_available(slot_id).await? {
            info!(%slot_id, "slot deleted");
            return Ok(());
        }

        let slot = self.store.get(slot_id).await?;
        Err(ParkError::SlotUnavailable(format!(
            "slot {} is booked and cannot be deleted",
            slot.slot_number
        )))
    }
}

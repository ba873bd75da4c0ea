//! PostgreSQL implementations of the core storage traits.
//!
//! Every call is bounded by the configured I/O timeout. Connectivity failures
//! and timeouts surface as `StoreUnavailable`; nothing is retried here.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use eyre::eyre;
use parkspot_core::{
    errors::{ParkError, ParkResult},
    models::{
        slot::{Booking, ParkingSlot, SlotFilter, SlotPatch, SlotState},
        user::{Session, User},
    },
    store::{IdentityStore, SlotStore},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    repositories::{parking_slot, user},
    DbPool,
};

async fn bounded<T, F>(timeout: Duration, op: &'static str, fut: F) -> ParkResult<T>
where
    F: Future<Output = eyre::Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(ParkError::StoreUnavailable),
        Err(_) => {
            warn!(op, ?timeout, "store operation timed out");
            Err(ParkError::StoreUnavailable(eyre!(
                "{} timed out after {:?}",
                op,
                timeout
            )))
        }
    }
}

fn is_unique_violation(report: &eyre::Report) -> bool {
    report
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}

fn slot_not_found(id: Uuid) -> ParkError {
    ParkError::NotFound(format!("Parking slot with ID {} not found", id))
}

#[derive(Clone)]
pub struct PgSlotStore {
    pool: DbPool,
    timeout: Duration,
}

impl PgSlotStore {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl SlotStore for PgSlotStore {
    async fn create(&self, slot_number: i32, state: SlotState) -> ParkResult<ParkingSlot> {
        let (booked_by, valid_from, valid_till) = match &state {
            SlotState::Available => (None, None, None),
            SlotState::Booked(b) => (Some(b.user_id.as_str()), b.valid_from, b.valid_till),
        };

        let insert = parking_slot::create_parking_slot(
            &self.pool,
            slot_number,
            booked_by,
            valid_from,
            valid_till,
        );
        match tokio::time::timeout(self.timeout, insert).await {
            Ok(Ok(row)) => Ok(row.into()),
            Ok(Err(report)) if is_unique_violation(&report) => {
                debug!(slot_number, "slot number already taken");
                Err(ParkError::DuplicateSlotNumber(slot_number))
            }
            Ok(Err(report)) => Err(ParkError::StoreUnavailable(report)),
            Err(_) => Err(ParkError::StoreUnavailable(eyre!(
                "create timed out after {:?}",
                self.timeout
            ))),
        }
    }

    async fn get(&self, id: Uuid) -> ParkResult<ParkingSlot> {
        bounded(
            self.timeout,
            "get",
            parking_slot::get_parking_slot_by_id(&self.pool, id),
        )
        .await?
        .map(Into::into)
        .ok_or_else(|| slot_not_found(id))
    }

    async fn get_by_slot_number(&self, slot_number: i32) -> ParkResult<ParkingSlot> {
        bounded(
            self.timeout,
            "get_by_slot_number",
            parking_slot::get_parking_slot_by_number(&self.pool, slot_number),
        )
        .await?
        .map(Into::into)
        .ok_or_else(|| {
            ParkError::NotFound(format!("Parking slot number {} not found", slot_number))
        })
    }

    async fn list(&self, filter: SlotFilter) -> ParkResult<Vec<ParkingSlot>> {
        let rows = bounded(
            self.timeout,
            "list",
            parking_slot::list_parking_slots(&self.pool, filter.available),
        )
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, patch: SlotPatch) -> ParkResult<ParkingSlot> {
        bounded(
            self.timeout,
            "update",
            parking_slot::update_parking_slot(&self.pool, id, &patch),
        )
        .await?
        .map(Into::into)
        .ok_or_else(|| slot_not_found(id))
    }

    async fn update_if(
        &self,
        id: Uuid,
        expected: ParkingSlot,
        patch: SlotPatch,
    ) -> ParkResult<Option<ParkingSlot>> {
        let row = bounded(
            self.timeout,
            "update_if",
            parking_slot::update_parking_slot_if(&self.pool, id, &expected, &patch),
        )
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> ParkResult<()> {
        let deleted = bounded(
            self.timeout,
            "delete",
            parking_slot::delete_parking_slot(&self.pool, id),
        )
        .await?;
        if deleted { Ok(()) } else { Err(slot_not_found(id)) }
    }

    async fn book_if_available(
        &self,
        id: Uuid,
        booking: Booking,
    ) -> ParkResult<Option<ParkingSlot>> {
        let row = bounded(
            self.timeout,
            "book_if_available",
            parking_slot::book_parking_slot(
                &self.pool,
                id,
                &booking.user_id,
                booking.valid_from,
                booking.valid_till,
            ),
        )
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete_if_available(&self, id: Uuid) -> ParkResult<bool> {
        bounded(
            self.timeout,
            "delete_if_available",
            parking_slot::delete_available_parking_slot(&self.pool, id),
        )
        .await
    }
}

#[derive(Clone)]
pub struct PgIdentityStore {
    pool: DbPool,
    timeout: Duration,
}

impl PgIdentityStore {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> ParkResult<User> {
        let insert = user::create_user(&self.pool, username, password_hash);
        match tokio::time::timeout(self.timeout, insert).await {
            Ok(Ok(row)) => Ok(row.into()),
            Ok(Err(report)) if is_unique_violation(&report) => Err(ParkError::Validation(
                format!("username {} is already taken", username),
            )),
            Ok(Err(report)) => Err(ParkError::StoreUnavailable(report)),
            Err(_) => Err(ParkError::StoreUnavailable(eyre!(
                "create_user timed out after {:?}",
                self.timeout
            ))),
        }
    }

    async fn find_user(&self, id: Uuid) -> ParkResult<Option<User>> {
        let row = bounded(self.timeout, "find_user", user::get_user_by_id(&self.pool, id)).await?;
        Ok(row.map(Into::into))
    }

    async fn find_user_by_username(&self, username: &str) -> ParkResult<Option<User>> {
        let row = bounded(
            self.timeout,
            "find_user_by_username",
            user::get_user_by_username(&self.pool, username),
        )
        .await?;
        Ok(row.map(Into::into))
    }

    async fn create_session(&self, session: Session) -> ParkResult<Session> {
        let purged = bounded(
            self.timeout,
            "delete_expired_sessions",
            user::delete_expired_sessions(&self.pool, Utc::now()),
        )
        .await?;
        if purged > 0 {
            debug!(purged, "expired sessions removed");
        }

        let row = bounded(
            self.timeout,
            "create_session",
            user::create_session(&self.pool, &session.token, session.user_id, session.expires_at),
        )
        .await?;
        Ok(row.into())
    }

    async fn find_session(&self, token: &str) -> ParkResult<Option<Session>> {
        let row = bounded(self.timeout, "find_session", user::get_session(&self.pool, token)).await?;
        Ok(row.map(Into::into))
    }

    async fn delete_session(&self, token: &str) -> ParkResult<()> {
        bounded(self.timeout, "delete_session", user::delete_session(&self.pool, token)).await
    }
}

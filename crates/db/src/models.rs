use chrono::{DateTime, Utc};
use parkspot_core::models::{
    slot::ParkingSlot,
    user::{Session, User},
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbParkingSlot {
    pub id: Uuid,
    pub slot_number: i32,
    pub is_available: bool,
    pub booked_by: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_till: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<DbParkingSlot> for ParkingSlot {
    fn from(row: DbParkingSlot) -> Self {
        Self {
            id: row.id,
            slot_number: row.slot_number,
            is_available: row.is_available,
            booked_by: row.booked_by,
            valid_from: row.valid_from,
            valid_till: row.valid_till,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<DbSession> for Session {
    fn from(row: DbSession) -> Self {
        Self {
            token: row.token,
            user_id: row.user_id,
            expires_at: row.expires_at,
        }
    }
}

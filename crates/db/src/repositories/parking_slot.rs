use crate::models::DbParkingSlot;
use chrono::{DateTime, Utc};
use eyre::Result;
use parkspot_core::models::slot::{ParkingSlot, SlotPatch};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SLOT_COLUMNS: &str =
    "id, slot_number, is_available, booked_by, valid_from, valid_till, created_at";

pub async fn create_parking_slot(
    pool: &Pool<Postgres>,
    slot_number: i32,
    booked_by: Option<&str>,
    valid_from: Option<DateTime<Utc>>,
    valid_till: Option<DateTime<Utc>>,
) -> Result<DbParkingSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating parking slot: id={}, slot_number={}, booked={}",
        id,
        slot_number,
        booked_by.is_some()
    );

    let slot = sqlx::query_as::<_, DbParkingSlot>(&format!(
        r#"
        INSERT INTO parking_slots (id, slot_number, is_available, booked_by, valid_from, valid_till, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(slot_number)
    .bind(booked_by.is_none())
    .bind(booked_by)
    .bind(valid_from)
    .bind(valid_till)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

pub async fn get_parking_slot_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbParkingSlot>> {
    let slot = sqlx::query_as::<_, DbParkingSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM parking_slots
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_parking_slot_by_number(
    pool: &Pool<Postgres>,
    slot_number: i32,
) -> Result<Option<DbParkingSlot>> {
    let slot = sqlx::query_as::<_, DbParkingSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM parking_slots
        WHERE slot_number = $1
        "#
    ))
    .bind(slot_number)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Lists slots ordered by number; `available = None` returns all of them.
pub async fn list_parking_slots(
    pool: &Pool<Postgres>,
    available: Option<bool>,
) -> Result<Vec<DbParkingSlot>> {
    let slots = sqlx::query_as::<_, DbParkingSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM parking_slots
        WHERE $1::BOOLEAN IS NULL OR is_available = $1
        ORDER BY slot_number ASC
        "#
    ))
    .bind(available)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn update_parking_slot(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &SlotPatch,
) -> Result<Option<DbParkingSlot>> {
    let slot = sqlx::query_as::<_, DbParkingSlot>(&format!(
        r#"
        UPDATE parking_slots
        SET is_available = COALESCE($2, is_available),
            booked_by = CASE WHEN $3 THEN $4 ELSE booked_by END,
            valid_from = CASE WHEN $5 THEN $6 ELSE valid_from END,
            valid_till = CASE WHEN $7 THEN $8 ELSE valid_till END
        WHERE id = $1
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(patch.is_available)
    .bind(patch.booked_by.is_some())
    .bind(patch.booked_by.clone().flatten())
    .bind(patch.valid_from.is_some())
    .bind(patch.valid_from.flatten())
    .bind(patch.valid_till.is_some())
    .bind(patch.valid_till.flatten())
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Applies the patch only while availability, holder and window still match
/// `expected`. `None` means the slot is gone or changed.
pub async fn update_parking_slot_if(
    pool: &Pool<Postgres>,
    id: Uuid,
    expected: &ParkingSlot,
    patch: &SlotPatch,
) -> Result<Option<DbParkingSlot>> {
    let slot = sqlx::query_as::<_, DbParkingSlot>(&format!(
        r#"
        UPDATE parking_slots
        SET is_available = COALESCE($2, is_available),
            booked_by = CASE WHEN $3 THEN $4 ELSE booked_by END,
            valid_from = CASE WHEN $5 THEN $6 ELSE valid_from END,
            valid_till = CASE WHEN $7 THEN $8 ELSE valid_till END
        WHERE id = $1
          AND is_available = $9
          AND booked_by IS NOT DISTINCT FROM $10::TEXT
          AND valid_from IS NOT DISTINCT FROM $11::TIMESTAMPTZ
          AND valid_till IS NOT DISTINCT FROM $12::TIMESTAMPTZ
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(patch.is_available)
    .bind(patch.booked_by.is_some())
    .bind(patch.booked_by.clone().flatten())
    .bind(patch.valid_from.is_some())
    .bind(patch.valid_from.flatten())
    .bind(patch.valid_till.is_some())
    .bind(patch.valid_till.flatten())
    .bind(expected.is_available)
    .bind(expected.booked_by.as_deref())
    .bind(expected.valid_from)
    .bind(expected.valid_till)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Books the slot only while it is still free. `None` means the guard did not match.
pub async fn book_parking_slot(
    pool: &Pool<Postgres>,
    id: Uuid,
    booked_by: &str,
    valid_from: Option<DateTime<Utc>>,
    valid_till: Option<DateTime<Utc>>,
) -> Result<Option<DbParkingSlot>> {
    let slot = sqlx::query_as::<_, DbParkingSlot>(&format!(
        r#"
        UPDATE parking_slots
        SET is_available = FALSE, booked_by = $2, valid_from = $3, valid_till = $4
        WHERE id = $1 AND is_available = TRUE
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(booked_by)
    .bind(valid_from)
    .bind(valid_till)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn delete_parking_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM parking_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_available_parking_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM parking_slots
        WHERE id = $1 AND is_available = TRUE
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

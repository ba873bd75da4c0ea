//! # Parking Slot Handlers
//!
//! Thin adapters between HTTP and the booking service. Every handler returns
//! the affected `ParkingSlot` except delete, which returns a confirmation.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use parkspot_core::models::slot::{
    BookSlotRequest, CreateSlotsRequest, DeleteSlotResponse, ParkingSlot, SlotFilter,
    UpdateSlotRequest,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Lists all slots, or only free/occupied ones with `?available=true|false`.
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<SlotFilter>,
) -> Result<Json<Vec<ParkingSlot>>, AppError> {
    let slots = match filter.available {
        Some(available) => state.booking.query_available(available).await?,
        None => state.booking.list_slots().await?,
    };

    Ok(Json(slots))
}

pub async fn get_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParkingSlot>, AppError> {
    Ok(Json(state.booking.get_slot(id).await?))
}

pub async fn get_slot_by_number(
    State(state): State<Arc<ApiState>>,
    Path(slot_number): Path<i32>,
) -> Result<Json<ParkingSlot>, AppError> {
    Ok(Json(state.booking.get_slot_by_number(slot_number).await?))
}

pub async fn create_slots(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSlotsRequest>,
) -> Result<Json<Vec<ParkingSlot>>, AppError> {
    let slots = state.booking.create_slots(payload.slots).await?;
    Ok(Json(slots))
}

pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<Json<ParkingSlot>, AppError> {
    Ok(Json(state.booking.update_slot(id, payload).await?))
}

pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteSlotResponse>, AppError> {
    state.booking.delete_slot(id).await?;

    Ok(Json(DeleteSlotResponse {
        message: format!("Parking slot {} deleted", id),
    }))
}

/// Books a slot for the authenticated caller.
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<ParkingSlot>, AppError> {
    let slot = state
        .booking
        .book(id, &current.user_id(), payload.valid_from, payload.valid_till)
        .await?;

    Ok(Json(slot))
}

pub async fn release_slot(
    State(state): State<Arc<ApiState>>,
    _current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ParkingSlot>, AppError> {
    Ok(Json(state.booking.release(id).await?))
}

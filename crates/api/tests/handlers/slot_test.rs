use std::sync::Arc;

use axum::http::StatusCode;
use mockall::predicate;
use parkspot_core::{
    errors::ParkError,
    models::slot::{DeleteSlotResponse, ParkingSlot},
    store::memory::MemoryIdentityStore,
};
use parkspot_db::mock::MockSlotStore;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{authorized, TestContext};

fn window() -> Value {
    json!({
        "valid_from": "2024-05-01T10:00:00Z",
        "valid_till": "2024-05-01T12:00:00Z",
    })
}

#[tokio::test]
async fn test_create_and_fetch_slots() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/slots")
        .json(&json!({ "slots": [{ "slot_number": 2 }, { "slot_number": 1 }] }))
        .await;
    response.assert_status_ok();
    let created = response.json::<Vec<ParkingSlot>>();
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|s| s.is_available && s.booked_by.is_none()));

    let listed = ctx.server.get("/api/slots").await.json::<Vec<ParkingSlot>>();
    let numbers: Vec<i32> = listed.iter().map(|s| s.slot_number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let by_number = ctx.server.get("/api/slots/number/2").await;
    by_number.assert_status_ok();
    assert_eq!(by_number.json::<ParkingSlot>().id, created[0].id);

    let by_id = ctx.server.get(&format!("/api/slots/{}", created[1].id)).await;
    by_id.assert_status_ok();
    assert_eq!(by_id.json::<ParkingSlot>().slot_number, 1);
}

#[tokio::test]
async fn test_unknown_slot_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/slots/number/99").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = ctx.server.get(&format!("/api/slots/{}", Uuid::new_v4())).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .contains("not found"));
}

#[tokio::test]
async fn test_duplicate_slot_number_conflicts() {
    let ctx = TestContext::new();
    ctx.create_slot(5).await;

    let response = ctx
        .server
        .post("/api/slots")
        .json(&json!({ "slots": [{ "slot_number": 5 }] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_booking_requires_session() {
    let ctx = TestContext::new();
    let slot = ctx.create_slot(1).await;

    let response = ctx
        .server
        .post(&format!("/api/slots/{}/book", slot.id))
        .json(&window())
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = authorized(
        ctx.server.post(&format!("/api/slots/{}/book", slot.id)),
        "not-a-real-token",
    )
    .json(&window())
    .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_book_and_release_flow() {
    let ctx = TestContext::new();
    let auth = ctx.signup().await;
    ctx.create_slot(7).await;
    let slot = ctx.create_slot(12).await;

    let response = authorized(
        ctx.server.post(&format!("/api/slots/{}/book", slot.id)),
        &auth.token,
    )
    .json(&window())
    .await;
    response.assert_status_ok();
    let booked = response.json::<ParkingSlot>();
    assert!(!booked.is_available);
    assert_eq!(booked.booked_by, Some(auth.user.id.to_string()));

    let free = ctx
        .server
        .get("/api/slots")
        .add_query_param("available", true)
        .await
        .json::<Vec<ParkingSlot>>();
    assert_eq!(free.iter().map(|s| s.slot_number).collect::<Vec<_>>(), vec![7]);

    let response = authorized(
        ctx.server.post(&format!("/api/slots/{}/book", slot.id)),
        &auth.token,
    )
    .json(&window())
    .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = authorized(
        ctx.server.post(&format!("/api/slots/{}/release", slot.id)),
        &auth.token,
    )
    .await;
    response.assert_status_ok();
    let released = response.json::<ParkingSlot>();
    assert!(released.is_available);
    assert_eq!(released.booked_by, None);
    assert_eq!(released.valid_from, None);

    let free = ctx
        .server
        .get("/api/slots")
        .add_query_param("available", true)
        .await
        .json::<Vec<ParkingSlot>>();
    assert_eq!(
        free.iter().map(|s| s.slot_number).collect::<Vec<_>>(),
        vec![7, 12]
    );
}

#[tokio::test]
async fn test_reversed_window_is_bad_request() {
    let ctx = TestContext::new();
    let auth = ctx.signup().await;
    let slot = ctx.create_slot(3).await;

    let response = authorized(
        ctx.server.post(&format!("/api/slots/{}/book", slot.id)),
        &auth.token,
    )
    .json(&json!({
        "valid_from": "2024-05-01T12:00:00Z",
        "valid_till": "2024-05-01T10:00:00Z",
    }))
    .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let unchanged = ctx
        .server
        .get(&format!("/api/slots/{}", slot.id))
        .await
        .json::<ParkingSlot>();
    assert_eq!(unchanged, slot);
}

#[tokio::test]
async fn test_update_slot_corrects_availability() {
    let ctx = TestContext::new();
    let slot = ctx.create_slot(4).await;

    let response = ctx
        .server
        .put(&format!("/api/slots/{}", slot.id))
        .json(&json!({ "is_available": false, "booked_by": "maintenance" }))
        .await;
    response.assert_status_ok();
    let updated = response.json::<ParkingSlot>();
    assert!(!updated.is_available);
    assert_eq!(updated.booked_by.as_deref(), Some("maintenance"));

    let response = ctx
        .server
        .put(&format!("/api/slots/{}", slot.id))
        .json(&json!({ "is_available": true }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<ParkingSlot>().booked_by, None);

    let response = ctx
        .server
        .put(&format!("/api/slots/{}", slot.id))
        .json(&json!({ "is_available": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_rejects_booked_slot() {
    let ctx = TestContext::new();
    let auth = ctx.signup().await;
    let slot = ctx.create_slot(8).await;

    authorized(
        ctx.server.post(&format!("/api/slots/{}/book", slot.id)),
        &auth.token,
    )
    .json(&window())
    .await
    .assert_status_ok();

    let response = ctx.server.delete(&format!("/api/slots/{}", slot.id)).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    authorized(
        ctx.server.post(&format!("/api/slots/{}/release", slot.id)),
        &auth.token,
    )
    .await
    .assert_status_ok();

    let response = ctx.server.delete(&format!("/api/slots/{}", slot.id)).await;
    response.assert_status_ok();
    assert!(response
        .json::<DeleteSlotResponse>()
        .message
        .contains(&slot.id.to_string()));

    let response = ctx.server.get(&format!("/api/slots/{}", slot.id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_outage_is_service_unavailable() {
    let mut slots = MockSlotStore::new();
    slots
        .expect_get_by_slot_number()
        .with(predicate::eq(1))
        .returning(|_| Err(ParkError::StoreUnavailable(eyre::eyre!("connection refused"))));

    let ctx = TestContext::with_stores(
        Arc::new(slots),
        Arc::new(MemoryIdentityStore::new()),
        chrono::Duration::hours(24),
    );

    let response = ctx.server.get("/api/slots/number/1").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

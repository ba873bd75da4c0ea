use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum_test::{TestRequest, TestServer};
use fake::{faker::internet::en::Username, Fake};
use parkspot_api::{build_router, config::ApiConfig, ApiState};
use parkspot_core::{
    models::{slot::ParkingSlot, user::AuthResponse},
    store::{
        memory::{MemoryIdentityStore, MemorySlotStore},
        IdentityStore, SlotStore,
    },
};
use serde_json::json;

pub struct TestContext {
    pub server: TestServer,
}

impl TestContext {
    /// Server backed by in-memory stores.
    pub fn new() -> Self {
        Self::with_stores(
            Arc::new(MemorySlotStore::new()),
            Arc::new(MemoryIdentityStore::new()),
            chrono::Duration::hours(24),
        )
    }

    pub fn with_stores(
        slots: Arc<dyn SlotStore>,
        identity: Arc<dyn IdentityStore>,
        session_ttl: chrono::Duration,
    ) -> Self {
        Self::with_config(slots, identity, session_ttl, &ApiConfig::default())
    }

    pub fn with_config(
        slots: Arc<dyn SlotStore>,
        identity: Arc<dyn IdentityStore>,
        session_ttl: chrono::Duration,
        config: &ApiConfig,
    ) -> Self {
        let state = ApiState::new(slots, identity, session_ttl);
        let app = build_router(state, config);
        let server = TestServer::new(app).expect("Failed to start test server");
        Self { server }
    }

    /// Signs up a fresh user and returns the session.
    pub async fn signup(&self) -> AuthResponse {
        let username: String = Username().fake();
        let response = self
            .server
            .post("/api/auth/signup")
            .json(&json!({ "username": format!("{}-{}", username, uuid::Uuid::new_v4()), "password": "correct-horse" }))
            .await;
        response.assert_status_ok();
        response.json::<AuthResponse>()
    }

    pub async fn create_slot(&self, slot_number: i32) -> ParkingSlot {
        let response = self
            .server
            .post("/api/slots")
            .json(&json!({ "slots": [{ "slot_number": slot_number }] }))
            .await;
        response.assert_status_ok();
        response.json::<Vec<ParkingSlot>>().remove(0)
    }
}

pub fn authorized(request: TestRequest, token: &str) -> TestRequest {
    let value = HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value");
    request.add_header(AUTHORIZATION, value)
}

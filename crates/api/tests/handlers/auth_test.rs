use std::sync::Arc;

use axum::http::StatusCode;
use mockall::predicate;
use parkspot_core::{
    errors::ParkError,
    models::user::{AuthResponse, LogoutResponse, UserResponse},
    store::memory::{MemoryIdentityStore, MemorySlotStore},
};
use parkspot_db::mock::MockIdentityStore;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{authorized, TestContext};

#[tokio::test]
async fn test_signup_then_me() {
    let ctx = TestContext::new();
    let auth = ctx.signup().await;

    assert_eq!(auth.token.len(), 48);
    assert!(auth.expires_at > chrono::Utc::now());

    let response = authorized(ctx.server.get("/api/auth/me"), &auth.token).await;
    response.assert_status_ok();
    let me = response.json::<UserResponse>();
    assert_eq!(me.id, auth.user.id);
    assert_eq!(me.username, auth.user.username);
}

#[tokio::test]
async fn test_login_checks_password() {
    let ctx = TestContext::new();
    ctx.server
        .post("/api/auth/signup")
        .json(&json!({ "username": "driver", "password": "s3cret-pass" }))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "driver", "password": "wrong-pass" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "nobody", "password": "s3cret-pass" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "driver", "password": "s3cret-pass" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<AuthResponse>().user.username, "driver");
}

#[tokio::test]
async fn test_signup_validation() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/auth/signup")
        .json(&json!({ "username": "driver", "password": "short" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = ctx
        .server
        .post("/api/auth/signup")
        .json(&json!({ "username": "   ", "password": "long-enough" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    ctx.server
        .post("/api/auth/signup")
        .json(&json!({ "username": "driver", "password": "long-enough" }))
        .await
        .assert_status_ok();
    let response = ctx
        .server
        .post("/api/auth/signup")
        .json(&json!({ "username": "driver", "password": "long-enough" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let ctx = TestContext::new();
    let auth = ctx.signup().await;

    let response = authorized(ctx.server.post("/api/auth/logout"), &auth.token).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<LogoutResponse>().message,
        "Logged out successfully"
    );

    let response = authorized(ctx.server.get("/api/auth/me"), &auth.token).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let ctx = TestContext::with_stores(
        Arc::new(MemorySlotStore::new()),
        Arc::new(MemoryIdentityStore::new()),
        chrono::Duration::seconds(-1),
    );
    let auth = ctx.signup().await;

    let response = authorized(ctx.server.get("/api/auth/me"), &auth.token).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_identity_outage_is_service_unavailable() {
    let mut identity = MockIdentityStore::new();
    identity
        .expect_find_user_by_username()
        .with(predicate::eq("driver"))
        .times(1)
        .returning(|_| Err(ParkError::StoreUnavailable(eyre::eyre!("connection refused"))));

    let ctx = TestContext::with_stores(
        Arc::new(MemorySlotStore::new()),
        Arc::new(identity),
        chrono::Duration::hours(24),
    );

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "driver", "password": "s3cret-pass" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

use axum::{extract::State, Json};
use chrono::Utc;
use parkspot_core::{
    errors::ParkError,
    models::user::{
        AuthResponse, LoginRequest, LogoutResponse, Session, SignupRequest, User, UserResponse,
    },
};
use std::sync::Arc;

use crate::{
    middleware::{
        auth::{self, CurrentUser},
        error_handling::AppError,
    },
    ApiState,
};

const MIN_PASSWORD_LENGTH: usize = 6;

async fn start_session(state: &ApiState, user: User) -> Result<AuthResponse, AppError> {
    let session = state
        .identity
        .create_session(Session {
            token: auth::generate_session_token(),
            user_id: user.id,
            expires_at: Utc::now() + state.session_ttl,
        })
        .await?;

    Ok(AuthResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: user.into(),
    })
}

pub async fn signup(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ParkError::Validation("username must not be empty".to_string()).into());
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ParkError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ))
        .into());
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = state.identity.create_user(username, &password_hash).await?;
    tracing::info!(user_id = %user.id, "user signed up");

    Ok(Json(start_session(&state, user).await?))
}

pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let invalid = || AppError(ParkError::Authentication("Invalid username or password".to_string()));

    let user = state
        .identity
        .find_user_by_username(payload.username.trim())
        .await?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&payload.password, &user.password_hash)? {
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(start_session(&state, user).await?))
}

pub async fn logout(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<LogoutResponse>, AppError> {
    state.identity.delete_session(&current.token).await?;

    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

pub async fn me(current: CurrentUser) -> Json<UserResponse> {
    Json(current.user.into())
}

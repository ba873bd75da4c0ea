//! # Authentication Module
//!
//! Password hashing for accounts and the request extractor that turns a
//! session token into the caller's identity.
//!
//! Passwords are stored as Argon2 PHC strings. Sessions are opaque random
//! tokens presented as `Authorization: Bearer <token>`.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use parkspot_core::{
    errors::{ParkError, ParkResult},
    models::user::User,
};
use rand::{distributions::Alphanumeric, Rng};

use crate::{middleware::error_handling::AppError, ApiState};

const TOKEN_LENGTH: usize = 48;

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call, so hashing the same
/// password twice yields different strings.
pub fn hash_password(password: &str) -> ParkResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ParkError::Internal(format!("Error hashing password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Checks a plain password against a stored PHC hash.
pub fn verify_password(password: &str, password_hash: &str) -> ParkResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| ParkError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Pulls the bearer token out of the `Authorization` header.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

impl CurrentUser {
    /// Stable identifier recorded as the holder of a booking.
    pub fn user_id(&self) -> String {
        self.user.id.to_string()
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ParkError::Authentication("Missing session token".to_string()))?
            .to_string();

        let session = state
            .identity
            .find_session(&token)
            .await?
            .filter(|session| !session.is_expired(Utc::now()))
            .ok_or_else(|| ParkError::Authentication("Session expired or invalid".to_string()))?;

        let user = state
            .identity
            .find_user(session.user_id)
            .await?
            .ok_or_else(|| ParkError::Authentication("Unknown session user".to_string()))?;

        tracing::debug!(user_id = %user.id, "request authenticated");
        Ok(CurrentUser { user, token })
    }
}

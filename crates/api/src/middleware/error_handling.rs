//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! handler reports failures the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parkspot_core::errors::ParkError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps `ParkError` and implements `IntoResponse`, producing
/// `{ "error": "<message>" }` with the matching status code.
#[derive(Debug)]
pub struct AppError(pub ParkError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ParkError::NotFound(_) => StatusCode::NOT_FOUND,
            ParkError::DuplicateSlotNumber(_) => StatusCode::CONFLICT,
            ParkError::SlotUnavailable(_) => StatusCode::CONFLICT,
            ParkError::InvalidWindow { .. } => StatusCode::BAD_REQUEST,
            ParkError::Validation(_) => StatusCode::BAD_REQUEST,
            ParkError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ParkError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ParkError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self.0, "request failed");
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Automatic conversion from ParkError to AppError
impl From<ParkError> for AppError {
    fn from(err: ParkError) -> Self {
        AppError(err)
    }
}

/// Maps a ParkError to an HTTP response
pub fn map_error(err: ParkError) -> Response {
    AppError(err).into_response()
}

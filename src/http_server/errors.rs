//! Error payloads and bearer-token helpers shared by all routes

use axum::{
    extract::Json,
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;

use crate::auth::{AuthError, Identity};
use crate::events::EventError;

use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    /// One entry per violation when a registration is rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code(),
            details: None,
        }
    }
}

impl From<EventError> for ErrorResponse {
    fn from(err: EventError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code(),
            details: err.details(),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Turn a domain error into a response with the matching status
pub fn reject<E: Into<ErrorResponse>>(err: E) -> ApiError {
    let body = err.into();
    let status = StatusCode::from_u16(body.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body))
}

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify the caller's bearer token
pub fn require_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let token =
        extract_bearer_token(headers).ok_or_else(|| reject(AuthError::AuthenticationRequired))?;
    state.auth.authenticate(token).map_err(reject)
}

/// Like [`require_identity`], but a missing header is not an error
pub fn optional_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Identity>, ApiError> {
    match extract_bearer_token(headers) {
        Some(token) => state.auth.authenticate(token).map(Some).map_err(reject),
        None => Ok(None),
    }
}

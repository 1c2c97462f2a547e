//! Auth HTTP Routes
//!
//! Login and "who am I" on top of the shared AuthService.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::auth::{LoginRequest, LoginResponse, Role, User};
use crate::observability::{Event, Logger};

use super::errors::{reject, require_identity, ApiError};
use super::state::AppState;

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Login handler
async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = request.email.trim().to_string();

    match state.auth.login(request) {
        Ok(response) => {
            Logger::event(
                Event::LoginSucceeded,
                &[("email", email.as_str()), ("role", response.role.as_str())],
            );
            Ok(Json(response))
        }
        Err(e) => {
            let reason = e.to_string();
            Logger::event(
                Event::LoginFailed,
                &[("email", email.as_str()), ("reason", reason.as_str())],
            );
            Err(reject(e))
        }
    }
}

/// Current user handler (requires Authorization header)
async fn me_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let identity = require_identity(&state, &headers)?;
    let user = state.auth.get_user(identity.user_id).map_err(reject)?;
    Ok(Json(UserResponse::from(&user)))
}

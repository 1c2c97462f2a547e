//! User management routes

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::auth::CreateUserRequest;
use crate::observability::{Event, Logger};

use super::auth_routes::UserResponse;
use super::errors::{optional_identity, reject, require_identity, ApiError};
use super::state::AppState;

pub fn user_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_users_handler).post(create_user_handler))
        .route("/:id", get(get_user_handler))
        .with_state(state)
}

/// All accounts; administrators only
async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let identity = require_identity(&state, &headers)?;
    identity.require_admin().map_err(reject)?;

    let users = state.auth.list_users().map_err(reject)?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// One account; the user themself or an administrator
async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let identity = require_identity(&state, &headers)?;
    identity.require_self_or_admin(user_id).map_err(reject)?;

    let user = state.auth.get_user(user_id).map_err(reject)?;
    Ok(Json(UserResponse::from(&user)))
}

/// Sign up. A bearer token is only needed to create administrators.
async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let caller = optional_identity(&state, &headers)?;
    let user = state
        .auth
        .create_user(request, caller.as_ref())
        .map_err(reject)?;

    let user_id = user.id.to_string();
    Logger::event(
        Event::UserCreated,
        &[("role", user.role.as_str()), ("user_id", user_id.as_str())],
    );

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

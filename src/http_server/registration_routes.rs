//! Registration routes
//!
//! Submissions run through the form validator; a rejected submission answers
//! 400 with every violation listed in `details`.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::events::{RegistrationView, SubmitRegistrationRequest};

use super::errors::{reject, require_identity, ApiError};
use super::state::AppState;

pub fn registration_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(submit_handler))
        .route("/:user_id/:event_custom_field_id", get(read_handler))
        .with_state(state)
}

async fn submit_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SubmitRegistrationRequest>,
) -> Result<Json<RegistrationView>, ApiError> {
    let caller = require_identity(&state, &headers)?;
    let registration = state
        .events
        .submit_registration(request, &caller)
        .map_err(reject)?;
    // 200 rather than 201: a resubmission overwrites the stored answers
    Ok(Json(registration))
}

async fn read_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((user_id, event_custom_field_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<RegistrationView>>, ApiError> {
    let caller = require_identity(&state, &headers)?;
    let registrations = state
        .events
        .registrations_for(user_id, event_custom_field_id, &caller)
        .map_err(reject)?;
    Ok(Json(registrations))
}

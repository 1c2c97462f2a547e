//! Administrator routes for events and custom fields
//!
//! Every handler needs an administrator token; the service re-checks the role.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::events::{
    AssignFieldsRequest, CreateCustomFieldRequest, CreateEventRequest, CustomField,
    EventCustomField, EventDetails,
};

use super::errors::{reject, require_identity, ApiError};
use super::state::AppState;

pub fn admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/create", post(create_event_handler))
        .route("/custom-field", post(create_custom_field_handler))
        .route("/assign-fields", post(assign_fields_handler))
        .route("/custom-fields", get(list_custom_fields_handler))
        .route("/all", get(list_events_handler))
        .route("/delete/:event_id", delete(delete_event_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub event_id: Uuid,
}

async fn create_event_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDetails>), ApiError> {
    let admin = require_identity(&state, &headers)?;
    let event = state.events.create_event(request, &admin).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn create_custom_field_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateCustomFieldRequest>,
) -> Result<(StatusCode, Json<CustomField>), ApiError> {
    let admin = require_identity(&state, &headers)?;
    let field = state
        .events
        .create_custom_field(request, &admin)
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(field)))
}

async fn assign_fields_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<AssignFieldsRequest>,
) -> Result<Json<Vec<EventCustomField>>, ApiError> {
    let admin = require_identity(&state, &headers)?;
    let assigned = state.events.assign_fields(request, &admin).map_err(reject)?;
    Ok(Json(assigned))
}

async fn list_custom_fields_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<CustomField>>, ApiError> {
    let admin = require_identity(&state, &headers)?;
    let fields = state.events.list_custom_fields(&admin).map_err(reject)?;
    Ok(Json(fields))
}

async fn list_events_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<EventDetails>>, ApiError> {
    let admin = require_identity(&state, &headers)?;
    admin.require_admin().map_err(reject)?;
    let events = state.events.list_events().map_err(reject)?;
    Ok(Json(events))
}

async fn delete_event_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(event_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let admin = require_identity(&state, &headers)?;
    state.events.delete_event(event_id, &admin).map_err(reject)?;
    Ok(Json(DeleteResponse {
        deleted: true,
        event_id,
    }))
}

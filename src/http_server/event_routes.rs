//! Event catalog routes (any authenticated user)

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::HeaderMap,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::events::EventDetails;

use super::errors::{reject, require_identity, ApiError};
use super::state::AppState;

pub fn event_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_events_handler))
        .route("/:id", get(get_event_handler))
        .with_state(state)
}

async fn list_events_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<EventDetails>>, ApiError> {
    require_identity(&state, &headers)?;
    let events = state.events.list_events().map_err(reject)?;
    Ok(Json(events))
}

async fn get_event_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetails>, ApiError> {
    require_identity(&state, &headers)?;
    let event = state.events.get_event(event_id).map_err(reject)?;
    Ok(Json(event))
}

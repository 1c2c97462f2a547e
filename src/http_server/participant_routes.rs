//! Participant routes: who is coming, availability and comments

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::events::{
    AddCommentRequest, Availability, CommentView, ParticipantView, UpdateAvailabilityRequest,
};

use super::errors::{reject, require_identity, ApiError};
use super::state::AppState;

pub fn participant_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/:event_id/participants", get(participants_handler))
        .route("/update-availability", post(update_availability_handler))
        .route("/add-comment", post(add_comment_handler))
        .route("/:event_id/comments", get(comments_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub participant_id: Uuid,
    pub availability: Availability,
    pub is_available: bool,
}

async fn participants_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<ParticipantView>>, ApiError> {
    require_identity(&state, &headers)?;
    let participants = state
        .events
        .participants_for_event(event_id)
        .map_err(reject)?;
    Ok(Json(participants))
}

async fn update_availability_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let caller = require_identity(&state, &headers)?;
    let participant_id = request.participant_id;
    let availability = state
        .events
        .update_availability(request, &caller)
        .map_err(reject)?;

    Ok(Json(AvailabilityResponse {
        participant_id,
        availability,
        is_available: availability.is_available(),
    }))
}

async fn add_comment_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentView>), ApiError> {
    let caller = require_identity(&state, &headers)?;
    let comment = state.events.add_comment(request, &caller).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn comments_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<CommentView>>, ApiError> {
    require_identity(&state, &headers)?;
    let comments = state.events.comments_for_event(event_id).map_err(reject)?;
    Ok(Json(comments))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use agenda_core::{Event, EventDraft};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::InvalidId(id.to_string()))
}

/// GET /api/events - All events in creation order.
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.engine.list_all()?))
}

/// GET /api/events/{id}
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.engine.get_by_id(id)?))
}

/// POST /api/events - Create an event; the id is assigned here.
async fn create_event(
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.engine.propose_create(draft)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/{id} - Replace every field of an event except its id.
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<EventDraft>,
) -> Result<Json<Event>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.engine.propose_update(id, draft)?))
}

/// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.engine.propose_delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use agenda_core::CoreError;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Ready once the store answers a lookup. A miss counts as an answer.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.engine.get_by_id(Uuid::nil()) {
        Ok(_) | Err(CoreError::Rejected(_)) => {
            (StatusCode::OK, Json(HealthResponse { status: "ok" }))
        }
        Err(CoreError::Storage(e)) => {
            tracing::warn!("Store not ready: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                }),
            )
        }
    }
}

//! Conversion of engine outcomes into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use agenda_core::{CoreError, Rejection};

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The path segment is not a UUID.
    #[error("Invalid event ID: {0}")]
    InvalidId(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::InvalidId(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Core(CoreError::Rejected(rejection)) => match rejection {
                Rejection::NotFound(_) => (StatusCode::NOT_FOUND, "Event not found".to_string()),
                Rejection::DuplicateName(_) => (
                    StatusCode::CONFLICT,
                    "An event with this name already exists".to_string(),
                ),
                Rejection::InvalidDateRange { .. } => (
                    StatusCode::BAD_REQUEST,
                    "Start date must be before end date".to_string(),
                ),
                Rejection::EmptyName => (StatusCode::BAD_REQUEST, rejection.to_string()),
            },
            ApiError::Core(CoreError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = json!({
            "message": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

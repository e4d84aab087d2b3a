//! Agenda Server - Axum JSON API for events.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{AllowedOrigins, Config};
pub use error::ApiError;
pub use state::AppState;

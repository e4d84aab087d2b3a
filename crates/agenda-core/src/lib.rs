//! Agenda Core - Domain models, validation, and the event engine.
//!
//! This crate contains the rules for creating, updating and deleting
//! events. Persistence is reached through the [`EventStore`] trait; it has
//! no dependencies on other Agenda crates.

pub mod engine;
pub mod error;
pub mod event;
pub mod storage;
pub mod validation;

// Re-exports for convenience
pub use engine::EventEngine;
pub use error::{CoreError, Rejection, StorageError};
pub use event::{name_key, names_match, Event, EventDraft};
pub use storage::EventStore;
pub use validation::Validator;

#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::InMemoryEventStore;

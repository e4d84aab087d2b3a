use std::sync::Arc;

use agenda_core::{EventEngine, EventStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: EventEngine,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            engine: EventEngine::new(store),
        }
    }
}

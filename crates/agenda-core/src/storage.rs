use uuid::Uuid;

use crate::error::StorageError;
use crate::event::Event;

/// Trait for storing and retrieving events.
///
/// Every call is atomic on its own. Nothing spans calls, so a caller that
/// reads and then writes must expect the store to have changed in between.
pub trait EventStore: Send + Sync {
    /// Get all events in insertion order.
    fn find_all(&self) -> Result<Vec<Event>, StorageError>;

    /// Get an event by ID.
    fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, StorageError>;

    /// Get the event whose name equals `name` ignoring case.
    fn find_by_name_case_insensitive(&self, name: &str) -> Result<Option<Event>, StorageError>;

    fn exists_by_id(&self, id: Uuid) -> Result<bool, StorageError>;

    /// Insert a new event or replace the stored one with the same ID.
    ///
    /// A replaced event keeps its position in `find_all` order. Fails with
    /// `StorageError::DuplicateName` if a different event already owns the
    /// name (case-insensitively); the check and the write happen atomically.
    fn save(&self, event: Event) -> Result<Event, StorageError>;

    /// Delete an event. Returns false if it did not exist.
    fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError>;
}

// In-memory implementation for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    #[derive(Default)]
    struct Inner {
        events: Vec<Event>,
        /// Lower-cased name -> event id.
        names: HashMap<String, Uuid>,
    }

    /// In-memory event store for testing.
    #[derive(Default)]
    pub struct InMemoryEventStore {
        inner: RwLock<Inner>,
    }

    impl InMemoryEventStore {
        pub fn new() -> Self {
            Self::default()
        }

        fn poisoned<T>(_: T) -> StorageError {
            StorageError::Database("lock poisoned".to_string())
        }
    }

    impl EventStore for InMemoryEventStore {
        fn find_all(&self) -> Result<Vec<Event>, StorageError> {
            Ok(self.inner.read().map_err(Self::poisoned)?.events.clone())
        }

        fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, StorageError> {
            let inner = self.inner.read().map_err(Self::poisoned)?;
            Ok(inner.events.iter().find(|e| e.id == id).cloned())
        }

        fn find_by_name_case_insensitive(
            &self,
            name: &str,
        ) -> Result<Option<Event>, StorageError> {
            let inner = self.inner.read().map_err(Self::poisoned)?;
            let Some(id) = inner.names.get(&crate::event::name_key(name)) else {
                return Ok(None);
            };
            Ok(inner.events.iter().find(|e| e.id == *id).cloned())
        }

        fn exists_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
            let inner = self.inner.read().map_err(Self::poisoned)?;
            Ok(inner.events.iter().any(|e| e.id == id))
        }

        fn save(&self, event: Event) -> Result<Event, StorageError> {
            let mut inner = self.inner.write().map_err(Self::poisoned)?;
            let key = event.name_key();

            // Unique name constraint
            if let Some(owner) = inner.names.get(&key) {
                if *owner != event.id {
                    return Err(StorageError::DuplicateName(event.name));
                }
            }

            match inner.events.iter().position(|e| e.id == event.id) {
                Some(pos) => {
                    let old_key = inner.events[pos].name_key();
                    inner.names.remove(&old_key);
                    inner.events[pos] = event.clone();
                }
                None => inner.events.push(event.clone()),
            }
            inner.names.insert(key, event.id);

            Ok(event)
        }

        fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
            let mut inner = self.inner.write().map_err(Self::poisoned)?;
            let Some(pos) = inner.events.iter().position(|e| e.id == id) else {
                return Ok(false);
            };
            let removed = inner.events.remove(pos);
            inner.names.remove(&removed.name_key());
            Ok(true)
        }
    }

}

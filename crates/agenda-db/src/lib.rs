//! Agenda DB - redb implementation of the event store.

pub mod event_store;
pub mod tables;

pub use event_store::RedbEventStore;

use std::path::Path;
use std::sync::Arc;

use redb::Database;

use agenda_core::StorageError;

/// Initialize a database with all required tables.
pub fn init_database(path: impl AsRef<Path>) -> Result<Arc<Database>, StorageError> {
    let db = Database::create(path).map_err(|e| StorageError::Database(e.to_string()))?;

    RedbEventStore::init_tables(&db)?;

    Ok(Arc::new(db))
}

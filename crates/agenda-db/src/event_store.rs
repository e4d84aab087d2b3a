use std::sync::Arc;

use redb::{Database, ReadTransaction, ReadableTable, WriteTransaction};
use uuid::Uuid;

use agenda_core::{name_key, Event, EventStore, StorageError};

use crate::tables::{
    COUNTERS_TABLE, EVENTS_TABLE, EVENT_IDS_TABLE, EVENT_NAMES_TABLE, EVENT_SEQUENCE,
};

fn db_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(e.to_string())
}

/// redb implementation of EventStore.
///
/// Events are keyed by an insertion sequence so `find_all` returns them in
/// creation order. Lower-cased names live in a unique index that `save`
/// checks and updates inside the same write transaction.
pub struct RedbEventStore {
    db: Arc<Database>,
}

impl RedbEventStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Initialize the database tables.
    pub fn init_tables(db: &Database) -> Result<(), StorageError> {
        let write_txn = db.begin_write().map_err(db_err)?;
        {
            let _ = write_txn.open_table(EVENTS_TABLE).map_err(db_err)?;
            let _ = write_txn.open_table(EVENT_IDS_TABLE).map_err(db_err)?;
            let _ = write_txn.open_table(EVENT_NAMES_TABLE).map_err(db_err)?;
            let _ = write_txn.open_table(COUNTERS_TABLE).map_err(db_err)?;
        }
        write_txn.commit().map_err(db_err)?;
        Ok(())
    }

    fn read_event(txn: &ReadTransaction, id_key: &[u8]) -> Result<Option<Event>, StorageError> {
        let ids = txn.open_table(EVENT_IDS_TABLE).map_err(db_err)?;
        let Some(seq) = ids.get(id_key).map_err(db_err)?.map(|v| v.value()) else {
            return Ok(None);
        };

        let events = txn.open_table(EVENTS_TABLE).map_err(db_err)?;
        match events.get(seq).map_err(db_err)? {
            Some(value) => {
                let event: Event = serde_json::from_slice(value.value()).map_err(db_err)?;
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    fn write_event(
        txn: &WriteTransaction,
        event: &Event,
        value: &[u8],
    ) -> Result<(), StorageError> {
        let id_key = event.id.as_bytes().as_slice();
        let key = event.name_key();

        let mut names = txn.open_table(EVENT_NAMES_TABLE).map_err(db_err)?;
        let owner = names
            .get(key.as_str())
            .map_err(db_err)?
            .map(|v| v.value().to_vec());
        if let Some(owner) = owner {
            if owner.as_slice() != id_key {
                return Err(StorageError::DuplicateName(event.name.clone()));
            }
        }

        let mut ids = txn.open_table(EVENT_IDS_TABLE).map_err(db_err)?;
        let mut events = txn.open_table(EVENTS_TABLE).map_err(db_err)?;

        let existing_seq = ids.get(id_key).map_err(db_err)?.map(|v| v.value());
        let seq = match existing_seq {
            Some(seq) => {
                // Renamed: release the previous name
                let previous = events
                    .get(seq)
                    .map_err(db_err)?
                    .map(|v| v.value().to_vec());
                if let Some(previous) = previous {
                    let previous: Event = serde_json::from_slice(&previous).map_err(db_err)?;
                    let previous_key = previous.name_key();
                    if previous_key != key {
                        names.remove(previous_key.as_str()).map_err(db_err)?;
                    }
                }
                seq
            }
            None => {
                let mut counters = txn.open_table(COUNTERS_TABLE).map_err(db_err)?;
                let next = counters
                    .get(EVENT_SEQUENCE)
                    .map_err(db_err)?
                    .map(|v| v.value())
                    .unwrap_or(0)
                    + 1;
                counters.insert(EVENT_SEQUENCE, next).map_err(db_err)?;
                ids.insert(id_key, next).map_err(db_err)?;
                next
            }
        };

        events.insert(seq, value).map_err(db_err)?;
        names.insert(key.as_str(), id_key).map_err(db_err)?;
        Ok(())
    }

    fn remove_event(txn: &WriteTransaction, id: Uuid) -> Result<bool, StorageError> {
        let id_key = id.as_bytes().as_slice();

        let mut ids = txn.open_table(EVENT_IDS_TABLE).map_err(db_err)?;
        let Some(seq) = ids.remove(id_key).map_err(db_err)?.map(|v| v.value()) else {
            return Ok(false);
        };

        let mut events = txn.open_table(EVENTS_TABLE).map_err(db_err)?;
        let removed = events
            .remove(seq)
            .map_err(db_err)?
            .map(|v| v.value().to_vec());

        if let Some(removed) = removed {
            let removed: Event = serde_json::from_slice(&removed).map_err(db_err)?;
            let mut names = txn.open_table(EVENT_NAMES_TABLE).map_err(db_err)?;
            names.remove(removed.name_key().as_str()).map_err(db_err)?;
        }

        Ok(true)
    }
}

impl EventStore for RedbEventStore {
    fn find_all(&self) -> Result<Vec<Event>, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let table = read_txn.open_table(EVENTS_TABLE).map_err(db_err)?;

        let mut events = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (_, value) = entry.map_err(db_err)?;
            let event: Event = serde_json::from_slice(value.value()).map_err(db_err)?;
            events.push(event);
        }

        Ok(events)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        Self::read_event(&read_txn, id.as_bytes().as_slice())
    }

    fn find_by_name_case_insensitive(&self, name: &str) -> Result<Option<Event>, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let names = read_txn.open_table(EVENT_NAMES_TABLE).map_err(db_err)?;

        let owner = names
            .get(name_key(name).as_str())
            .map_err(db_err)?
            .map(|v| v.value().to_vec());
        match owner {
            Some(id_key) => Self::read_event(&read_txn, &id_key),
            None => Ok(None),
        }
    }

    fn exists_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let ids = read_txn.open_table(EVENT_IDS_TABLE).map_err(db_err)?;
        Ok(ids.get(id.as_bytes().as_slice()).map_err(db_err)?.is_some())
    }

    fn save(&self, event: Event) -> Result<Event, StorageError> {
        let value = serde_json::to_vec(&event).map_err(db_err)?;

        let write_txn = self.db.begin_write().map_err(db_err)?;
        if let Err(e) = Self::write_event(&write_txn, &event, &value) {
            write_txn.abort().map_err(db_err)?;
            return Err(e);
        }
        write_txn.commit().map_err(db_err)?;

        Ok(event)
    }

    fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
        let write_txn = self.db.begin_write().map_err(db_err)?;
        let removed = match Self::remove_event(&write_txn, id) {
            Ok(removed) => removed,
            Err(e) => {
                write_txn.abort().map_err(db_err)?;
                return Err(e);
            }
        };
        write_txn.commit().map_err(db_err)?;

        Ok(removed)
    }
}

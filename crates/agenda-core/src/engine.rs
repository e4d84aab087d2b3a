//! Validation and mutation of events.
//!
//! The engine decides whether a proposed create, update or delete may
//! proceed and computes the record to persist. It performs no concurrency
//! of its own: each proposal is a sequence of store calls.
//!
//! The uniqueness lookup and the following `save` are separate store calls,
//! so two concurrent proposals for the same name can both pass the lookup.
//! The store's own unique name constraint is authoritative; when it fires,
//! the failed write is reported as [`Rejection::DuplicateName`] just like
//! the early check.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{CoreError, Rejection, StorageError};
use crate::event::{names_match, Event, EventDraft};
use crate::storage::EventStore;
use crate::validation::Validator;

/// Decides on event proposals against an [`EventStore`].
#[derive(Clone)]
pub struct EventEngine {
    store: Arc<dyn EventStore>,
}

impl EventEngine {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// All events in storage order.
    pub fn list_all(&self) -> Result<Vec<Event>, CoreError> {
        Ok(self.store.find_all()?)
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<Event, CoreError> {
        self.store.find_by_id(id)?.ok_or_else(|| {
            tracing::debug!(%id, "Lookup rejected: not found");
            Rejection::NotFound(id).into()
        })
    }

    /// Create a new event from `draft`.
    ///
    /// Rejects a name already used by any event (ignoring case), then a
    /// start date after the end date. Writes exactly once on success.
    pub fn propose_create(&self, draft: EventDraft) -> Result<Event, CoreError> {
        Self::check_name(&draft.name)?;
        self.ensure_name_available(&draft.name)?;
        Validator::validate_date_range(draft.start_date, draft.end_date).inspect_err(|_| {
            tracing::debug!(
                start = %draft.start_date,
                end = %draft.end_date,
                "Create rejected: start after end"
            );
        })?;

        let event = Event::from_draft(Uuid::new_v4(), draft);
        let saved = self.store.save(event).map_err(Self::rejected_save)?;

        tracing::info!(id = %saved.id, name = %saved.name, "Event created");
        Ok(saved)
    }

    /// Replace every field of event `id` except the id itself.
    ///
    /// Keeping the current name (in any letter casing) never conflicts.
    /// Unlike creation, the date range is not checked: an update may leave
    /// the start after the end.
    pub fn propose_update(&self, id: Uuid, draft: EventDraft) -> Result<Event, CoreError> {
        let Some(current) = self.store.find_by_id(id)? else {
            tracing::debug!(%id, "Update rejected: not found");
            return Err(Rejection::NotFound(id).into());
        };

        Self::check_name(&draft.name)?;
        if !names_match(&current.name, &draft.name) {
            self.ensure_name_available(&draft.name)?;
        }

        let updated = current.replaced_with(draft);
        let saved = self.store.save(updated).map_err(Self::rejected_save)?;

        tracing::info!(id = %saved.id, name = %saved.name, "Event updated");
        Ok(saved)
    }

    pub fn propose_delete(&self, id: Uuid) -> Result<(), CoreError> {
        if !self.store.exists_by_id(id)? {
            tracing::debug!(%id, "Delete rejected: not found");
            return Err(Rejection::NotFound(id).into());
        }

        self.store.delete_by_id(id)?;
        tracing::info!(%id, "Event deleted");
        Ok(())
    }

    fn check_name(name: &str) -> Result<(), CoreError> {
        Validator::validate_name(name).inspect_err(|_| {
            tracing::debug!("Proposal rejected: empty name");
        })?;
        Ok(())
    }

    /// Map a failed `save`, logging when the store's name constraint fired.
    fn rejected_save(err: StorageError) -> CoreError {
        if let StorageError::DuplicateName(name) = &err {
            tracing::debug!(requested = %name, "Save rejected: name taken in store");
        }
        CoreError::from_save(err)
    }

    fn ensure_name_available(&self, name: &str) -> Result<(), CoreError> {
        if let Some(existing) = self.store.find_by_name_case_insensitive(name)? {
            tracing::debug!(requested = name, existing = %existing.id, "Name already in use");
            return Err(Rejection::DuplicateName(name.to_string()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryEventStore;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn draft(name: &str) -> EventDraft {
        EventDraft::new(name, "Description", at(1, 9), at(1, 17), "Location")
    }

    fn setup() -> (EventEngine, Arc<InMemoryEventStore>) {
        let store = Arc::new(InMemoryEventStore::new());
        (EventEngine::new(store.clone()), store)
    }

    fn rejection(result: Result<impl std::fmt::Debug, CoreError>) -> Rejection {
        match result {
            Err(CoreError::Rejected(r)) => r,
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    /// Store whose every call fails.
    struct BrokenStore;

    impl EventStore for BrokenStore {
        fn find_all(&self) -> Result<Vec<Event>, StorageError> {
            Err(StorageError::Database("unreachable".to_string()))
        }
        fn find_by_id(&self, _: Uuid) -> Result<Option<Event>, StorageError> {
            Err(StorageError::Database("unreachable".to_string()))
        }
        fn find_by_name_case_insensitive(&self, _: &str) -> Result<Option<Event>, StorageError> {
            Err(StorageError::Database("unreachable".to_string()))
        }
        fn exists_by_id(&self, _: Uuid) -> Result<bool, StorageError> {
            Err(StorageError::Database("unreachable".to_string()))
        }
        fn save(&self, _: Event) -> Result<Event, StorageError> {
            Err(StorageError::Database("unreachable".to_string()))
        }
        fn delete_by_id(&self, _: Uuid) -> Result<bool, StorageError> {
            Err(StorageError::Database("unreachable".to_string()))
        }
    }

    #[test]
    fn test_create_assigns_id_and_persists() {
        let (engine, store) = setup();

        let event = engine.propose_create(draft("New Event")).unwrap();

        assert_eq!(event.name, "New Event");
        assert_eq!(store.find_by_id(event.id).unwrap(), Some(event));
    }

    #[test]
    fn test_list_all_in_creation_order() {
        let (engine, _) = setup();

        engine
            .propose_create(EventDraft::new(
                "Event 1",
                "Description 1",
                at(1, 9),
                at(2, 17),
                "Location 1",
            ))
            .unwrap();
        engine
            .propose_create(EventDraft::new(
                "Event 2",
                "Description 2",
                at(5, 9),
                at(10, 17),
                "Location 2",
            ))
            .unwrap();

        let all = engine.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Event 1");
        assert_eq!(all[1].name, "Event 2");
    }

    #[test]
    fn test_get_by_id() {
        let (engine, _) = setup();
        let created = engine.propose_create(draft("Tech Summit")).unwrap();

        assert_eq!(engine.get_by_id(created.id).unwrap().name, "Tech Summit");

        let missing = Uuid::nil();
        assert_eq!(
            rejection(engine.get_by_id(missing)),
            Rejection::NotFound(missing)
        );
    }

    #[test]
    fn test_create_duplicate_name_any_case() {
        let (engine, store) = setup();
        engine.propose_create(draft("Duplicate Event")).unwrap();

        for name in ["Duplicate Event", "duplicate event", "DUPLICATE EVENT"] {
            assert_eq!(
                rejection(engine.propose_create(draft(name))),
                Rejection::DuplicateName(name.to_string())
            );
        }
        assert_eq!(store.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_create_start_after_end() {
        let (engine, store) = setup();

        let backwards = EventDraft::new("New Event", "d", at(2, 10), at(1, 18), "l");
        assert_eq!(
            rejection(engine.propose_create(backwards)),
            Rejection::InvalidDateRange {
                start: at(2, 10),
                end: at(1, 18),
            }
        );
        assert!(store.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_same_start_and_end() {
        let (engine, _) = setup();
        let instant = EventDraft::new("Instant", "d", at(1, 12), at(1, 12), "l");
        assert!(engine.propose_create(instant).is_ok());
    }

    /// Store whose lookups see no name owner but whose `save` finds one,
    /// as when a concurrent proposal commits between check and write.
    struct LosingRaceStore {
        existing: Event,
    }

    impl EventStore for LosingRaceStore {
        fn find_all(&self) -> Result<Vec<Event>, StorageError> {
            Ok(vec![self.existing.clone()])
        }
        fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, StorageError> {
            Ok((id == self.existing.id).then(|| self.existing.clone()))
        }
        fn find_by_name_case_insensitive(&self, _: &str) -> Result<Option<Event>, StorageError> {
            Ok(None)
        }
        fn exists_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
            Ok(id == self.existing.id)
        }
        fn save(&self, event: Event) -> Result<Event, StorageError> {
            Err(StorageError::DuplicateName(event.name))
        }
        fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
            Ok(id == self.existing.id)
        }
    }

    #[test]
    fn test_create_duplicate_found_by_store() {
        let existing = Event::from_draft(Uuid::new_v4(), draft("Original"));
        let engine = EventEngine::new(Arc::new(LosingRaceStore { existing }));

        assert_eq!(
            rejection(engine.propose_create(draft("Contested"))),
            Rejection::DuplicateName("Contested".to_string())
        );
    }

    #[test]
    fn test_update_duplicate_found_by_store() {
        let existing = Event::from_draft(Uuid::new_v4(), draft("Original"));
        let id = existing.id;
        let engine = EventEngine::new(Arc::new(LosingRaceStore { existing }));

        assert_eq!(
            rejection(engine.propose_update(id, draft("Contested"))),
            Rejection::DuplicateName("Contested".to_string())
        );
        // Same-name updates skip the lookup but still hit the store constraint
        assert!(matches!(
            engine.propose_update(id, draft("ORIGINAL")),
            Err(CoreError::Rejected(Rejection::DuplicateName(_)))
        ));
    }

    #[test]
    fn test_create_duplicate_checked_before_dates() {
        let (engine, _) = setup();
        engine.propose_create(draft("Taken")).unwrap();

        let both_wrong = EventDraft::new("taken", "d", at(2, 10), at(1, 18), "l");
        assert!(matches!(
            rejection(engine.propose_create(both_wrong)),
            Rejection::DuplicateName(_)
        ));
    }

    #[test]
    fn test_create_empty_name() {
        let (engine, _) = setup();
        assert_eq!(
            rejection(engine.propose_create(draft("  "))),
            Rejection::EmptyName
        );
    }

    #[test]
    fn test_update_keeping_name() {
        let (engine, _) = setup();
        let created = engine.propose_create(draft("Event Name")).unwrap();

        let mut changes = draft("Event Name");
        changes.description = "Updated description".to_string();
        let updated = engine.propose_update(created.id, changes).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.description, "Updated description");
    }

    #[test]
    fn test_update_recasing_own_name() {
        let (engine, _) = setup();
        let created = engine.propose_create(draft("Event Name")).unwrap();

        let updated = engine
            .propose_update(created.id, draft("EVENT NAME"))
            .unwrap();
        assert_eq!(updated.name, "EVENT NAME");
        assert_eq!(
            engine
                .list_all()
                .unwrap()
                .iter()
                .filter(|e| e.id == created.id)
                .count(),
            1
        );
    }

    #[test]
    fn test_update_to_other_events_name() {
        let (engine, _) = setup();
        engine.propose_create(draft("Event 1")).unwrap();
        let second = engine.propose_create(draft("Event 2")).unwrap();

        assert_eq!(
            rejection(engine.propose_update(second.id, draft("Event 1"))),
            Rejection::DuplicateName("Event 1".to_string())
        );
        assert_eq!(engine.get_by_id(second.id).unwrap().name, "Event 2");
    }

    #[test]
    fn test_update_missing_event() {
        let (engine, _) = setup();
        let id = Uuid::new_v4();

        assert_eq!(
            rejection(engine.propose_update(id, draft("Anything"))),
            Rejection::NotFound(id)
        );
        // Even a blank name reports the missing record first
        assert_eq!(
            rejection(engine.propose_update(id, draft(""))),
            Rejection::NotFound(id)
        );
    }

    #[test]
    fn test_update_does_not_check_dates() {
        let (engine, _) = setup();
        let created = engine.propose_create(draft("Event")).unwrap();

        let backwards = EventDraft::new("Event", "d", at(2, 10), at(1, 18), "l");
        let updated = engine.propose_update(created.id, backwards).unwrap();

        assert!(updated.start_date > updated.end_date);
    }

    #[test]
    fn test_update_replaces_optional_fields() {
        let (engine, _) = setup();
        let mut initial = draft("Event");
        initial.min_attendees = Some(5);
        initial.max_attendees = Some(50);
        initial.location_notes = Some("Back entrance".to_string());
        let created = engine.propose_create(initial).unwrap();

        let mut changes = draft("Event");
        changes.max_attendees = Some(2);
        let updated = engine.propose_update(created.id, changes).unwrap();

        assert_eq!(updated.min_attendees, None);
        assert_eq!(updated.max_attendees, Some(2));
        assert_eq!(updated.location_notes, None);
    }

    #[test]
    fn test_delete_then_get() {
        let (engine, _) = setup();
        let created = engine.propose_create(draft("Short Lived")).unwrap();

        engine.propose_delete(created.id).unwrap();

        assert_eq!(
            rejection(engine.get_by_id(created.id)),
            Rejection::NotFound(created.id)
        );
        assert_eq!(
            rejection(engine.propose_delete(created.id)),
            Rejection::NotFound(created.id)
        );
        // Name can be reused after deletion
        assert!(engine.propose_create(draft("short lived")).is_ok());
    }

    #[test]
    fn test_store_failures_propagate() {
        let engine = EventEngine::new(Arc::new(BrokenStore));

        assert!(matches!(engine.list_all(), Err(CoreError::Storage(_))));
        assert!(matches!(
            engine.propose_create(draft("x")),
            Err(CoreError::Storage(StorageError::Database(_)))
        ));
        assert!(matches!(
            engine.propose_delete(Uuid::new_v4()),
            Err(CoreError::Storage(_))
        ));
    }

    #[test]
    fn test_concurrent_creates_keep_names_unique() {
        let (engine, store) = setup();

        let results: Vec<Result<Event, CoreError>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let engine = engine.clone();
                    let name = if i % 2 == 0 { "Race" } else { "RACE" };
                    s.spawn(move || engine.propose_create(draft(name)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for result in results.iter().filter(|r| r.is_err()) {
            assert!(matches!(
                result,
                Err(CoreError::Rejected(Rejection::DuplicateName(_)))
            ));
        }
        assert_eq!(store.find_all().unwrap().len(), 1);
    }
}

use redb::TableDefinition;

/// Table for storing events.
/// Key: insertion sequence number
/// Value: serialized Event as bytes
pub const EVENTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("events");

/// Index from event id to its sequence number.
/// Key: event UUID as bytes
/// Value: sequence number
pub const EVENT_IDS_TABLE: TableDefinition<&[u8], u64> = TableDefinition::new("event_ids");

/// Unique index on lower-cased event names.
/// Key: lower-cased name
/// Value: event UUID as bytes
pub const EVENT_NAMES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("event_names");

/// Monotonic counters.
/// Key: counter name
/// Value: last assigned value
pub const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Counter key for event sequence numbers.
pub const EVENT_SEQUENCE: &str = "events";

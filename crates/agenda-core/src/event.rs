use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Lower-cased form of a name, used for case-insensitive uniqueness.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Whether two names are equal when compared case-insensitively.
pub fn names_match(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

/// Candidate field values for creating or replacing an event.
///
/// Carries every field of [`Event`] except `id`. Dates may omit seconds
/// (`2025-12-01T10:00`) and attendee counts may arrive as strings, with
/// `""` meaning unset, as browser form inputs produce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_local_datetime")]
    pub start_date: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_local_datetime")]
    pub end_date: NaiveDateTime,
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_attendees")]
    pub min_attendees: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_attendees")]
    pub max_attendees: Option<u32>,
    pub location_notes: Option<String>,
    pub preparation_notes: Option<String>,
}

impl EventDraft {
    /// Create a draft with the required fields; optional fields are unset.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            start_date,
            end_date,
            location: location.into(),
            min_attendees: None,
            max_attendees: None,
            location_notes: None,
            preparation_notes: None,
        }
    }
}

const LOCAL_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn deserialize_local_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .ok_or_else(|| {
            de::Error::custom(format!(
                "invalid date-time `{}`, expected YYYY-MM-DDTHH:MM[:SS]",
                raw
            ))
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttendeeCount {
    Number(u32),
    Text(String),
}

fn deserialize_attendees<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<AttendeeCount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(AttendeeCount::Number(n)) => Ok(Some(n)),
        Some(AttendeeCount::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(AttendeeCount::Text(text)) => text.trim().parse().map(Some).map_err(|_| {
            de::Error::custom(format!(
                "invalid attendee count `{}`, expected a non-negative integer",
                text
            ))
        }),
    }
}

/// A stored event.
///
/// No relation between `min_attendees` and `max_attendees` is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub location: String,
    pub min_attendees: Option<u32>,
    pub max_attendees: Option<u32>,
    pub location_notes: Option<String>,
    pub preparation_notes: Option<String>,
}

impl Event {
    /// Build a record from a draft and a freshly assigned id.
    pub fn from_draft(id: Uuid, draft: EventDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            location: draft.location,
            min_attendees: draft.min_attendees,
            max_attendees: draft.max_attendees,
            location_notes: draft.location_notes,
            preparation_notes: draft.preparation_notes,
        }
    }

    /// Return a new record with every field except `id` taken from `draft`.
    pub fn replaced_with(&self, draft: EventDraft) -> Self {
        Self::from_draft(self.id, draft)
    }

    /// Case-insensitive uniqueness key for this event's name.
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

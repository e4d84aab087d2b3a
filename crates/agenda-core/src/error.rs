use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CoreError {
    /// Map a failed `save`: the store's uniqueness constraint becomes a
    /// duplicate-name rejection, anything else passes through untouched.
    pub fn from_save(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateName(name) => Rejection::DuplicateName(name).into(),
            other => CoreError::Storage(other),
        }
    }
}

/// Expected, caller-recoverable outcomes of a proposal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("An event with this name already exists: {0}")]
    DuplicateName(String),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Event name cannot be empty")]
    EmptyName,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Name already taken: {0}")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(String),
}

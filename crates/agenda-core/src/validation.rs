use chrono::NaiveDateTime;

use crate::error::Rejection;

/// Field-level checks for event drafts.
pub struct Validator;

impl Validator {
    /// Name must contain something other than whitespace.
    pub fn validate_name(name: &str) -> Result<(), Rejection> {
        if name.trim().is_empty() {
            return Err(Rejection::EmptyName);
        }
        Ok(())
    }

    /// Start must not fall after end. Equal instants are accepted.
    pub fn validate_date_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), Rejection> {
        if start > end {
            return Err(Rejection::InvalidDateRange { start, end });
        }
        Ok(())
    }
}

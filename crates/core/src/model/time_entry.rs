use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::EntryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimeEntryError {
    #[error("entry ends before it starts")]
    EndsBeforeStart,
}

/// An immutable record of one tracked start/stop interval.
///
/// Entries are created atomically when tracking stops and never change
/// afterwards; correcting a mistake means deleting the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    id: EntryId,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Creates an entry for a closed interval.
    ///
    /// # Errors
    ///
    /// Returns `TimeEntryError::EndsBeforeStart` if `ended_at < started_at`.
    pub fn new(
        id: EntryId,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Result<Self, TimeEntryError> {
        if ended_at < started_at {
            return Err(TimeEntryError::EndsBeforeStart);
        }
        Ok(Self {
            id,
            started_at,
            ended_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    /// Length of the tracked interval in whole seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> i64 {
        (self.ended_at - self.started_at).num_seconds()
    }
}

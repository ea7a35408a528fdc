use board_core::model::TimeEntry;
use sqlx::Row;

use crate::repository::{StorageError, TimeEntryRecord};

pub(super) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(super) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(super) fn map_entry_row(row: &sqlx::sqlite::SqliteRow) -> Result<TimeEntry, StorageError> {
    let record = TimeEntryRecord {
        id: row.try_get("id").map_err(ser)?,
        started_at: row.try_get("started_at").map_err(ser)?,
        ended_at: row.try_get("ended_at").map_err(ser)?,
    };
    record.into_entry().map_err(ser)
}

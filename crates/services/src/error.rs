//! Shared error types for the services crate.

use thiserror::Error;

use board_core::model::TimeEntryError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::board::BoardApiError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `TimeTrackerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimeTrackerError {
    #[error(transparent)]
    Entry(#[from] TimeEntryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `BoardService`.
///
/// Remote failures are surfaced to the caller rather than swallowed, so the
/// consuming layer owns retry/toast/log policy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BoardError {
    #[error(transparent)]
    Api(#[from] BoardApiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

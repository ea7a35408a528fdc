use thiserror::Error;

use crate::model::{ColumnError, TaskError, TimeEntryError};

/// Umbrella for domain validation failures, mostly useful at boundaries
/// that rehydrate several model types from the same payload.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Column(#[from] ColumnError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    TimeEntry(#[from] TimeEntryError),
}

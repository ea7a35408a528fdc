use std::sync::Arc;

use board_core::{Clock, ProgressConfig};
use board_core::model::ProjectId;
use storage::repository::Storage;

use crate::board::{BoardApi, BoardService};
use crate::error::{AppServicesError, ProgressServiceError, TimeTrackerError};
use crate::progress_service::ProgressService;
use crate::time_tracker::TimeTrackerService;

/// Assembles app-facing services over shared storage and the board API.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    storage: Storage,
    board_api: Arc<dyn BoardApi>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        board_api: Arc<dyn BoardApi>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self {
            clock,
            storage,
            board_api,
        })
    }

    /// Build services over in-memory storage, for tests and prototyping.
    #[must_use]
    pub fn in_memory(clock: Clock, board_api: Arc<dyn BoardApi>) -> Self {
        Self {
            clock,
            storage: Storage::in_memory(),
            board_api,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Board data service for one project.
    #[must_use]
    pub fn board(&self, project_id: ProjectId) -> BoardService {
        BoardService::new(project_id, Arc::clone(&self.board_api))
    }

    /// Hydrated time tracker for one project.
    ///
    /// # Errors
    ///
    /// Returns `TimeTrackerError` if hydration from storage fails.
    pub async fn time_tracker(
        &self,
        project_id: ProjectId,
    ) -> Result<TimeTrackerService, TimeTrackerError> {
        TimeTrackerService::load(
            project_id,
            Arc::clone(&self.storage.time_entries),
            Arc::clone(&self.storage.sessions),
            self.clock,
        )
        .await
    }

    /// Hydrated progress service, optionally persisted under `persist_key`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if hydration from storage fails.
    pub async fn progress(
        &self,
        config: ProgressConfig,
        persist_key: Option<String>,
    ) -> Result<ProgressService, ProgressServiceError> {
        ProgressService::hydrate(config, persist_key, Arc::clone(&self.storage.progress)).await
    }
}

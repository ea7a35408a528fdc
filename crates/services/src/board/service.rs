use std::sync::Arc;

use parking_lot::Mutex;

use board_core::model::{
    Column, ColumnId, ColumnPatch, NewAttachment, NewColumn, NewComment, NewTask, ProjectId, Task,
    TaskId, TaskPatch, WorksheetId, sort_by_order,
};

use super::api::BoardApi;
use crate::error::BoardError;

/// What happened to a `move_task` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The task was found in the cache and the status update was sent.
    Moved,
    /// The task is not in the local cache; no remote call was made. The
    /// remote may still know the task — a stale cache masks the move.
    NotCached,
}

/// Cached view of one worksheet's columns and tasks, with mutations that
/// write through to the remote board service.
///
/// The remote is the source of truth: every mutation is followed by a full
/// refetch of the affected list instead of an optimistic local edit. With no
/// worksheet selected, queries yield empty lists and mutations are silent
/// no-ops — nothing touches the remote.
pub struct BoardService {
    api: Arc<dyn BoardApi>,
    project_id: ProjectId,
    active_worksheet: Mutex<Option<WorksheetId>>,
    columns: Mutex<Vec<Column>>,
    tasks: Mutex<Vec<Task>>,
}

impl BoardService {
    #[must_use]
    pub fn new(project_id: ProjectId, api: Arc<dyn BoardApi>) -> Self {
        Self {
            api,
            project_id,
            active_worksheet: Mutex::new(None),
            columns: Mutex::new(Vec::new()),
            tasks: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    #[must_use]
    pub fn active_worksheet(&self) -> Option<WorksheetId> {
        self.active_worksheet.lock().clone()
    }

    /// Cached columns in display order.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        self.columns.lock().clone()
    }

    /// Cached tasks in the order the remote returned them.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().clone()
    }

    /// Switch the active worksheet. `Some` refetches both lists; `None`
    /// clears the caches without calling the remote.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the refetch fails.
    pub async fn select_worksheet(
        &self,
        worksheet_id: Option<WorksheetId>,
    ) -> Result<(), BoardError> {
        *self.active_worksheet.lock() = worksheet_id;
        self.refresh().await
    }

    /// Refetch both lists for the active worksheet, or clear the caches if
    /// none is selected.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if either fetch fails.
    pub async fn refresh(&self) -> Result<(), BoardError> {
        let Some(worksheet_id) = self.active_worksheet() else {
            self.columns.lock().clear();
            self.tasks.lock().clear();
            return Ok(());
        };
        self.refresh_columns(&worksheet_id).await?;
        self.refresh_tasks(&worksheet_id).await
    }

    async fn refresh_columns(&self, worksheet_id: &WorksheetId) -> Result<(), BoardError> {
        let mut columns = self.api.get_columns(&self.project_id, worksheet_id).await?;
        sort_by_order(&mut columns);
        tracing::debug!(
            worksheet = %worksheet_id,
            count = columns.len(),
            "refreshed column cache"
        );
        *self.columns.lock() = columns;
        Ok(())
    }

    async fn refresh_tasks(&self, worksheet_id: &WorksheetId) -> Result<(), BoardError> {
        let tasks = self.api.get_tasks(&self.project_id, worksheet_id).await?;
        tracing::debug!(
            worksheet = %worksheet_id,
            count = tasks.len(),
            "refreshed task cache"
        );
        *self.tasks.lock() = tasks;
        Ok(())
    }

    /// Create a column, then refetch the column list.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the remote call or the refetch fails.
    pub async fn add_column(&self, new: NewColumn) -> Result<(), BoardError> {
        let Some(worksheet_id) = self.active_worksheet() else {
            return Ok(());
        };
        self.api
            .create_column(&self.project_id, &worksheet_id, &new)
            .await?;
        self.refresh_columns(&worksheet_id).await
    }

    /// Patch a column, then refetch the column list.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the remote call or the refetch fails.
    pub async fn update_column(
        &self,
        column_id: &ColumnId,
        patch: ColumnPatch,
    ) -> Result<(), BoardError> {
        let Some(worksheet_id) = self.active_worksheet() else {
            return Ok(());
        };
        self.api
            .update_column(&self.project_id, &worksheet_id, column_id, &patch)
            .await?;
        self.refresh_columns(&worksheet_id).await
    }

    /// Delete a column, then refetch the column list.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the remote call or the refetch fails.
    pub async fn delete_column(&self, column_id: &ColumnId) -> Result<(), BoardError> {
        let Some(worksheet_id) = self.active_worksheet() else {
            return Ok(());
        };
        self.api
            .delete_column(&self.project_id, &worksheet_id, column_id)
            .await?;
        self.refresh_columns(&worksheet_id).await
    }

    /// Create a task, then refetch the task list.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the remote call or the refetch fails.
    pub async fn add_task(&self, new: NewTask) -> Result<(), BoardError> {
        let Some(worksheet_id) = self.active_worksheet() else {
            return Ok(());
        };
        self.api
            .create_task(&self.project_id, &worksheet_id, &new)
            .await?;
        self.refresh_tasks(&worksheet_id).await
    }

    /// Patch a task, then refetch the task list.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the remote call or the refetch fails.
    pub async fn update_task(&self, task_id: &TaskId, patch: TaskPatch) -> Result<(), BoardError> {
        let Some(worksheet_id) = self.active_worksheet() else {
            return Ok(());
        };
        self.api
            .update_task(&self.project_id, &worksheet_id, task_id, &patch)
            .await?;
        self.refresh_tasks(&worksheet_id).await
    }

    /// Delete a task, then refetch the task list.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the remote call or the refetch fails.
    pub async fn delete_task(&self, task_id: &TaskId) -> Result<(), BoardError> {
        let Some(worksheet_id) = self.active_worksheet() else {
            return Ok(());
        };
        self.api
            .delete_task(&self.project_id, &worksheet_id, task_id)
            .await?;
        self.refresh_tasks(&worksheet_id).await
    }

    /// Move a task to another column by updating its status.
    ///
    /// The task is looked up in the local cache first; if it is not there,
    /// no remote call is made and [`MoveOutcome::NotCached`] is returned.
    /// With no worksheet selected the cache is empty, so the same outcome
    /// applies.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the remote call or the refetch fails.
    pub async fn move_task(
        &self,
        task_id: &TaskId,
        new_status: impl Into<String>,
    ) -> Result<MoveOutcome, BoardError> {
        let cached = self.tasks.lock().iter().any(|task| task.id() == task_id);
        if !cached {
            tracing::debug!(task = %task_id, "move skipped, task not in local cache");
            return Ok(MoveOutcome::NotCached);
        }

        self.update_task(task_id, TaskPatch::status_only(new_status))
            .await?;
        Ok(MoveOutcome::Moved)
    }

    /// Add a comment to a task, then refetch the task list.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the remote call or the refetch fails.
    pub async fn add_comment(&self, task_id: &TaskId, new: NewComment) -> Result<(), BoardError> {
        let Some(worksheet_id) = self.active_worksheet() else {
            return Ok(());
        };
        self.api
            .add_comment(&self.project_id, &worksheet_id, task_id, &new)
            .await?;
        self.refresh_tasks(&worksheet_id).await
    }

    /// Attach a file to a task, then refetch the task list.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` if the remote call or the refetch fails.
    pub async fn add_attachment(
        &self,
        task_id: &TaskId,
        new: NewAttachment,
    ) -> Result<(), BoardError> {
        let Some(worksheet_id) = self.active_worksheet() else {
            return Ok(());
        };
        self.api
            .add_attachment(&self.project_id, &worksheet_id, task_id, &new)
            .await?;
        self.refresh_tasks(&worksheet_id).await
    }
}

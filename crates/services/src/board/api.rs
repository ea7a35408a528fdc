use async_trait::async_trait;
use thiserror::Error;

use board_core::model::{
    Column, ColumnId, ColumnPatch, NewAttachment, NewColumn, NewComment, NewTask, ProjectId, Task,
    TaskId, TaskPatch, WorksheetId,
};

/// Errors emitted by board API implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BoardApiError {
    #[error("board service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("invalid payload from board service: {0}")]
    InvalidPayload(#[from] board_core::Error),
}

/// The remote task/column service behind the kanban data layer.
///
/// All operations are keyed by project and worksheet; the remote is the
/// source of truth for both lists. Implementations: [`HttpBoardApi`] for
/// the real service, in-memory fakes for tests.
///
/// [`HttpBoardApi`]: crate::board::HttpBoardApi
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Fetch all columns of a worksheet.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport, status, or payload failures.
    async fn get_columns(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
    ) -> Result<Vec<Column>, BoardApiError>;

    /// Create a column and return the stored shape.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport, status, or payload failures.
    async fn create_column(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        new: &NewColumn,
    ) -> Result<Column, BoardApiError>;

    /// Apply a partial update to a column.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport or status failures.
    async fn update_column(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        column_id: &ColumnId,
        patch: &ColumnPatch,
    ) -> Result<(), BoardApiError>;

    /// Delete a column.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport or status failures.
    async fn delete_column(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        column_id: &ColumnId,
    ) -> Result<(), BoardApiError>;

    /// Fetch all tasks of a worksheet.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport, status, or payload failures.
    async fn get_tasks(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
    ) -> Result<Vec<Task>, BoardApiError>;

    /// Create a task and return the stored shape.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport, status, or payload failures.
    async fn create_task(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        new: &NewTask,
    ) -> Result<Task, BoardApiError>;

    /// Apply a partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport or status failures.
    async fn update_task(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        task_id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<(), BoardApiError>;

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport or status failures.
    async fn delete_task(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        task_id: &TaskId,
    ) -> Result<(), BoardApiError>;

    /// Add a comment to a task.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport or status failures.
    async fn add_comment(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        task_id: &TaskId,
        new: &NewComment,
    ) -> Result<(), BoardApiError>;

    /// Attach a file to a task.
    ///
    /// # Errors
    ///
    /// Returns `BoardApiError` on transport or status failures.
    async fn add_attachment(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        task_id: &TaskId,
        new: &NewAttachment,
    ) -> Result<(), BoardApiError>;
}

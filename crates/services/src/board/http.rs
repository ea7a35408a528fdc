use std::env;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use board_core::model::{
    Attachment, Column, ColumnId, ColumnPatch, Comment, NewAttachment, NewColumn, NewComment,
    NewTask, Priority, ProjectId, Task, TaskId, TaskPatch, WorksheetId,
};

use super::api::{BoardApi, BoardApiError};

#[derive(Clone, Debug)]
pub struct BoardApiConfig {
    pub base_url: String,
    pub api_token: Option<String>,
}

impl BoardApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
        }
    }

    /// Reads `BOARDKIT_API_URL` and optionally `BOARDKIT_API_TOKEN`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("BOARDKIT_API_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_token = env::var("BOARDKIT_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        Some(Self {
            base_url,
            api_token,
        })
    }
}

/// `reqwest`-backed implementation of [`BoardApi`].
#[derive(Clone)]
pub struct HttpBoardApi {
    client: Client,
    config: BoardApiConfig,
}

impl HttpBoardApi {
    #[must_use]
    pub fn new(config: BoardApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn worksheet_url(&self, project_id: &ProjectId, worksheet_id: &WorksheetId, tail: &str) -> String {
        format!(
            "{}/projects/{}/worksheets/{}/{tail}",
            self.config.base_url.trim_end_matches('/'),
            project_id,
            worksheet_id,
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BoardApiError> {
        let response = self.authorize(request).send().await?;
        if !response.status().is_success() {
            return Err(BoardApiError::Status(response.status()));
        }
        Ok(response)
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn get_columns(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
    ) -> Result<Vec<Column>, BoardApiError> {
        let url = self.worksheet_url(project_id, worksheet_id, "columns");
        let response = self.send(self.client.get(url)).await?;
        let body: Vec<ColumnDto> = response.json().await?;
        body.into_iter().map(ColumnDto::into_column).collect()
    }

    async fn create_column(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        new: &NewColumn,
    ) -> Result<Column, BoardApiError> {
        let url = self.worksheet_url(project_id, worksheet_id, "columns");
        let response = self.send(self.client.post(url).json(new)).await?;
        let body: ColumnDto = response.json().await?;
        body.into_column()
    }

    async fn update_column(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        column_id: &ColumnId,
        patch: &ColumnPatch,
    ) -> Result<(), BoardApiError> {
        let url = self.worksheet_url(project_id, worksheet_id, &format!("columns/{column_id}"));
        self.send(self.client.patch(url).json(patch)).await?;
        Ok(())
    }

    async fn delete_column(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        column_id: &ColumnId,
    ) -> Result<(), BoardApiError> {
        let url = self.worksheet_url(project_id, worksheet_id, &format!("columns/{column_id}"));
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn get_tasks(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
    ) -> Result<Vec<Task>, BoardApiError> {
        let url = self.worksheet_url(project_id, worksheet_id, "tasks");
        let response = self.send(self.client.get(url)).await?;
        let body: Vec<TaskDto> = response.json().await?;
        body.into_iter().map(TaskDto::into_task).collect()
    }

    async fn create_task(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        new: &NewTask,
    ) -> Result<Task, BoardApiError> {
        let url = self.worksheet_url(project_id, worksheet_id, "tasks");
        let response = self.send(self.client.post(url).json(new)).await?;
        let body: TaskDto = response.json().await?;
        body.into_task()
    }

    async fn update_task(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        task_id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<(), BoardApiError> {
        let url = self.worksheet_url(project_id, worksheet_id, &format!("tasks/{task_id}"));
        self.send(self.client.patch(url).json(patch)).await?;
        Ok(())
    }

    async fn delete_task(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        task_id: &TaskId,
    ) -> Result<(), BoardApiError> {
        let url = self.worksheet_url(project_id, worksheet_id, &format!("tasks/{task_id}"));
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn add_comment(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        task_id: &TaskId,
        new: &NewComment,
    ) -> Result<(), BoardApiError> {
        let url =
            self.worksheet_url(project_id, worksheet_id, &format!("tasks/{task_id}/comments"));
        self.send(self.client.post(url).json(new)).await?;
        Ok(())
    }

    async fn add_attachment(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        task_id: &TaskId,
        new: &NewAttachment,
    ) -> Result<(), BoardApiError> {
        let url = self.worksheet_url(
            project_id,
            worksheet_id,
            &format!("tasks/{task_id}/attachments"),
        );
        self.send(self.client.post(url).json(new)).await?;
        Ok(())
    }
}

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

/// Column as the board service serializes it; re-validated on receipt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnDto {
    id: ColumnId,
    title: String,
    status: String,
    #[serde(default)]
    color: String,
    order: u32,
    worksheet_id: WorksheetId,
}

impl ColumnDto {
    fn into_column(self) -> Result<Column, BoardApiError> {
        let column = Column::new(
            self.id,
            self.title,
            self.status,
            self.color,
            self.order,
            self.worksheet_id,
        )
        .map_err(board_core::Error::from)?;
        Ok(column)
    }
}

/// Task as the board service serializes it; re-validated on receipt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskDto {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    status: String,
    #[serde(default)]
    assignee_id: Option<board_core::model::MemberId>,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    priority: Priority,
    created_at: DateTime<Utc>,
    project_id: ProjectId,
    worksheet_id: WorksheetId,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    attachments: Vec<Attachment>,
}

impl TaskDto {
    fn into_task(self) -> Result<Task, BoardApiError> {
        let task = Task::from_persisted(
            self.id,
            self.project_id,
            self.worksheet_id,
            self.title,
            self.description,
            self.status,
            self.assignee_id,
            self.due_date,
            self.priority,
            self.created_at,
            self.comments,
            self.attachments,
        )
        .map_err(board_core::Error::from)?;
        Ok(task)
    }
}

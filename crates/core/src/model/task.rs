use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{AttachmentId, CommentId, MemberId, ProjectId, TaskId, WorksheetId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("task status cannot be empty")]
    EmptyStatus,

    #[error("unknown priority: {0}")]
    UnknownPriority(String),
}

//
// ─── PRIORITY ──────────────────────────────────────────────────────────────────
//

/// Task urgency level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(TaskError::UnknownPriority(other.to_string())),
        }
    }
}

//
// ─── COMMENT & ATTACHMENT ──────────────────────────────────────────────────────
//

/// A comment on a task, back-referencing its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<MemberId>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A file attached to a task, back-referencing its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: AttachmentId,
    pub task_id: TaskId,
    pub file_name: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

/// A card on a worksheet.
///
/// `status` should reference an existing column's status value within the
/// same worksheet; that invariant belongs to the remote board service and is
/// not enforced here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: String,
    assignee_id: Option<MemberId>,
    due_date: Option<DateTime<Utc>>,
    priority: Priority,
    created_at: DateTime<Utc>,
    project_id: ProjectId,
    worksheet_id: WorksheetId,
    comments: Vec<Comment>,
    attachments: Vec<Attachment>,
}

impl Task {
    /// Creates a task with the required fields; optional fields start unset.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::EmptyTitle` or `TaskError::EmptyStatus` if the
    /// respective field is blank after trimming.
    pub fn new(
        id: TaskId,
        project_id: ProjectId,
        worksheet_id: WorksheetId,
        title: impl Into<String>,
        status: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        let status = status.into();
        if status.trim().is_empty() {
            return Err(TaskError::EmptyStatus);
        }

        Ok(Self {
            id,
            title,
            description: None,
            status,
            assignee_id: None,
            due_date: None,
            priority: Priority::default(),
            created_at,
            project_id,
            worksheet_id,
            comments: Vec::new(),
            attachments: Vec::new(),
        })
    }

    /// Rehydrates a task from a persisted or wire representation.
    ///
    /// # Errors
    ///
    /// Returns `TaskError` if the stored title or status fail validation.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: TaskId,
        project_id: ProjectId,
        worksheet_id: WorksheetId,
        title: String,
        description: Option<String>,
        status: String,
        assignee_id: Option<MemberId>,
        due_date: Option<DateTime<Utc>>,
        priority: Priority,
        created_at: DateTime<Utc>,
        comments: Vec<Comment>,
        attachments: Vec<Attachment>,
    ) -> Result<Self, TaskError> {
        let mut task = Self::new(id, project_id, worksheet_id, title, status, created_at)?;
        task.description = description;
        task.assignee_id = assignee_id;
        task.due_date = due_date;
        task.priority = priority;
        task.comments = comments;
        task.attachments = attachments;
        Ok(task)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee_id: MemberId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn assignee_id(&self) -> Option<&MemberId> {
        self.assignee_id.as_ref()
    }

    #[must_use]
    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    #[must_use]
    pub fn worksheet_id(&self) -> &WorksheetId {
        &self.worksheet_id
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

//
// ─── REQUEST SHAPES ────────────────────────────────────────────────────────────
//

/// Payload for creating a task on the board service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<MemberId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
}

impl NewTask {
    /// Minimal payload: title plus the target column status.
    #[must_use]
    pub fn titled(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: status.into(),
            assignee_id: None,
            due_date: None,
            priority: Priority::default(),
        }
    }
}

/// Partial update for an existing task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// Patch that only moves the task to a new column status.
    #[must_use]
    pub fn status_only(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

/// Payload for adding a comment to a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<MemberId>,
}

/// Payload for attaching a file to a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttachment {
    pub file_name: String,
    pub url: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn build_task(id: &str) -> Task {
        Task::new(
            TaskId::new(id),
            ProjectId::new("proj-1"),
            WorksheetId::new("ws-1"),
            "Ship the release notes",
            "todo",
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_blank_title() {
        let err = Task::new(
            TaskId::new("t1"),
            ProjectId::new("proj-1"),
            WorksheetId::new("ws-1"),
            "  ",
            "todo",
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, TaskError::EmptyTitle);
    }

    #[test]
    fn builder_methods_set_optional_fields() {
        let task = build_task("t1")
            .with_description("Draft and publish")
            .with_assignee(MemberId::new("m-9"))
            .with_priority(Priority::High);
        assert_eq!(task.description(), Some("Draft and publish"));
        assert_eq!(task.assignee_id(), Some(&MemberId::new("m-9")));
        assert_eq!(task.priority(), Priority::High);
    }

    #[test]
    fn priority_round_trips_through_str() {
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(TaskError::UnknownPriority(_))
        ));
    }

    #[test]
    fn priority_serializes_lowercase() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }

    #[test]
    fn status_only_patch_carries_just_the_status() {
        let patch = TaskPatch::status_only("done");
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"status":"done"}"#);
    }

    #[test]
    fn from_persisted_restores_collections() {
        let comment = Comment {
            id: CommentId::new("c-1"),
            task_id: TaskId::new("t1"),
            author_id: None,
            body: "Looks good".to_string(),
            created_at: fixed_now(),
        };
        let task = Task::from_persisted(
            TaskId::new("t1"),
            ProjectId::new("proj-1"),
            WorksheetId::new("ws-1"),
            "Ship the release notes".to_string(),
            None,
            "todo".to_string(),
            None,
            None,
            Priority::Low,
            fixed_now(),
            vec![comment],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(task.comments().len(), 1);
        assert_eq!(task.priority(), Priority::Low);
    }
}

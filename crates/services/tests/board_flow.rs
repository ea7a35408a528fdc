use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use board_core::model::{
    Column, ColumnId, ColumnPatch, NewAttachment, NewColumn, NewComment, NewTask, Priority,
    ProjectId, Task, TaskId, TaskPatch, WorksheetId,
};
use board_core::time::fixed_now;
use services::{BoardApi, BoardApiError, BoardService, MoveOutcome};

/// In-memory stand-in for the remote board service. Counts every remote
/// call so tests can assert which operations never reach it.
#[derive(Default)]
struct FakeBoardApi {
    columns: Mutex<Vec<Column>>,
    tasks: Mutex<Vec<Task>>,
    calls: AtomicUsize,
}

impl FakeBoardApi {
    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn merge_task(task: &Task, patch: &TaskPatch) -> Task {
    Task::from_persisted(
        task.id().clone(),
        task.project_id().clone(),
        task.worksheet_id().clone(),
        patch.title.clone().unwrap_or_else(|| task.title().to_owned()),
        patch
            .description
            .clone()
            .or_else(|| task.description().map(str::to_owned)),
        patch
            .status
            .clone()
            .unwrap_or_else(|| task.status().to_owned()),
        patch.assignee_id.clone().or_else(|| task.assignee_id().cloned()),
        patch.due_date.or(task.due_date()),
        patch.priority.unwrap_or(task.priority()),
        task.created_at(),
        task.comments().to_vec(),
        task.attachments().to_vec(),
    )
    .expect("merged task is valid")
}

#[async_trait]
impl BoardApi for FakeBoardApi {
    async fn get_columns(
        &self,
        _project_id: &ProjectId,
        worksheet_id: &WorksheetId,
    ) -> Result<Vec<Column>, BoardApiError> {
        self.record_call();
        Ok(self
            .columns
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.worksheet_id() == worksheet_id)
            .cloned()
            .collect())
    }

    async fn create_column(
        &self,
        _project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        new: &NewColumn,
    ) -> Result<Column, BoardApiError> {
        self.record_call();
        let column = Column::new(
            ColumnId::generate(),
            new.title.clone(),
            new.status.clone(),
            new.color.clone(),
            new.order,
            worksheet_id.clone(),
        )
        .map_err(board_core::Error::from)?;
        self.columns.lock().unwrap().push(column.clone());
        Ok(column)
    }

    async fn update_column(
        &self,
        _project_id: &ProjectId,
        _worksheet_id: &WorksheetId,
        column_id: &ColumnId,
        patch: &ColumnPatch,
    ) -> Result<(), BoardApiError> {
        self.record_call();
        let mut columns = self.columns.lock().unwrap();
        if let Some(existing) = columns.iter_mut().find(|c| c.id() == column_id) {
            let merged = Column::new(
                existing.id().clone(),
                patch
                    .title
                    .clone()
                    .unwrap_or_else(|| existing.title().to_owned()),
                existing.status().to_owned(),
                patch
                    .color
                    .clone()
                    .unwrap_or_else(|| existing.color().to_owned()),
                patch.order.unwrap_or(existing.order()),
                existing.worksheet_id().clone(),
            )
            .map_err(board_core::Error::from)?;
            *existing = merged;
        }
        Ok(())
    }

    async fn delete_column(
        &self,
        _project_id: &ProjectId,
        _worksheet_id: &WorksheetId,
        column_id: &ColumnId,
    ) -> Result<(), BoardApiError> {
        self.record_call();
        self.columns.lock().unwrap().retain(|c| c.id() != column_id);
        Ok(())
    }

    async fn get_tasks(
        &self,
        _project_id: &ProjectId,
        worksheet_id: &WorksheetId,
    ) -> Result<Vec<Task>, BoardApiError> {
        self.record_call();
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.worksheet_id() == worksheet_id)
            .cloned()
            .collect())
    }

    async fn create_task(
        &self,
        project_id: &ProjectId,
        worksheet_id: &WorksheetId,
        new: &NewTask,
    ) -> Result<Task, BoardApiError> {
        self.record_call();
        let task = Task::new(
            TaskId::generate(),
            project_id.clone(),
            worksheet_id.clone(),
            new.title.clone(),
            new.status.clone(),
            fixed_now(),
        )
        .map_err(board_core::Error::from)?
        .with_priority(new.priority);
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        _project_id: &ProjectId,
        _worksheet_id: &WorksheetId,
        task_id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<(), BoardApiError> {
        self.record_call();
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(existing) = tasks.iter_mut().find(|t| t.id() == task_id) {
            *existing = merge_task(existing, patch);
        }
        Ok(())
    }

    async fn delete_task(
        &self,
        _project_id: &ProjectId,
        _worksheet_id: &WorksheetId,
        task_id: &TaskId,
    ) -> Result<(), BoardApiError> {
        self.record_call();
        self.tasks.lock().unwrap().retain(|t| t.id() != task_id);
        Ok(())
    }

    async fn add_comment(
        &self,
        _project_id: &ProjectId,
        _worksheet_id: &WorksheetId,
        task_id: &TaskId,
        new: &NewComment,
    ) -> Result<(), BoardApiError> {
        self.record_call();
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(existing) = tasks.iter_mut().find(|t| t.id() == task_id) {
            let comment = board_core::model::Comment {
                id: board_core::model::CommentId::generate(),
                task_id: task_id.clone(),
                author_id: new.author_id.clone(),
                body: new.body.clone(),
                created_at: fixed_now(),
            };
            let mut comments = existing.comments().to_vec();
            comments.push(comment);
            *existing = Task::from_persisted(
                existing.id().clone(),
                existing.project_id().clone(),
                existing.worksheet_id().clone(),
                existing.title().to_owned(),
                existing.description().map(str::to_owned),
                existing.status().to_owned(),
                existing.assignee_id().cloned(),
                existing.due_date(),
                existing.priority(),
                existing.created_at(),
                comments,
                existing.attachments().to_vec(),
            )
            .map_err(board_core::Error::from)?;
        }
        Ok(())
    }

    async fn add_attachment(
        &self,
        _project_id: &ProjectId,
        _worksheet_id: &WorksheetId,
        _task_id: &TaskId,
        _new: &NewAttachment,
    ) -> Result<(), BoardApiError> {
        self.record_call();
        Ok(())
    }
}

fn build_service(api: &Arc<FakeBoardApi>) -> BoardService {
    BoardService::new(
        ProjectId::new("proj-1"),
        Arc::clone(api) as Arc<dyn BoardApi>,
    )
}

#[tokio::test]
async fn board_flow_add_move_comment_delete() {
    let api = Arc::new(FakeBoardApi::default());
    let service = build_service(&api);

    service
        .select_worksheet(Some(WorksheetId::new("ws-1")))
        .await
        .unwrap();

    service
        .add_column(NewColumn {
            title: "To Do".to_string(),
            status: "todo".to_string(),
            color: "#94a3b8".to_string(),
            order: 0,
        })
        .await
        .unwrap();
    service
        .add_column(NewColumn {
            title: "Done".to_string(),
            status: "done".to_string(),
            color: "#22c55e".to_string(),
            order: 1,
        })
        .await
        .unwrap();
    assert_eq!(service.columns().len(), 2);
    assert_eq!(service.columns()[0].status(), "todo");

    let mut new_task = NewTask::titled("Write the changelog", "todo");
    new_task.priority = Priority::High;
    service.add_task(new_task).await.unwrap();

    let tasks = service.tasks();
    assert_eq!(tasks.len(), 1);
    let task_id = tasks[0].id().clone();
    assert_eq!(tasks[0].priority(), Priority::High);

    let outcome = service.move_task(&task_id, "done").await.unwrap();
    assert_eq!(outcome, MoveOutcome::Moved);
    assert_eq!(service.tasks()[0].status(), "done");

    service
        .add_comment(
            &task_id,
            NewComment {
                body: "shipped".to_string(),
                author_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(service.tasks()[0].comments().len(), 1);

    service.delete_task(&task_id).await.unwrap();
    assert!(service.tasks().is_empty());
}

#[tokio::test]
async fn mutations_without_a_worksheet_never_touch_the_remote() {
    let api = Arc::new(FakeBoardApi::default());
    let service = build_service(&api);

    assert!(service.columns().is_empty());
    assert!(service.tasks().is_empty());

    service
        .add_column(NewColumn {
            title: "To Do".to_string(),
            status: "todo".to_string(),
            color: String::new(),
            order: 0,
        })
        .await
        .unwrap();
    service
        .add_task(NewTask::titled("Orphan", "todo"))
        .await
        .unwrap();
    service
        .update_task(&TaskId::new("t-1"), TaskPatch::status_only("done"))
        .await
        .unwrap();
    service.delete_column(&ColumnId::new("c-1")).await.unwrap();

    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn move_of_an_uncached_task_makes_no_remote_call() {
    let api = Arc::new(FakeBoardApi::default());
    let service = build_service(&api);

    service
        .select_worksheet(Some(WorksheetId::new("ws-1")))
        .await
        .unwrap();
    let before = api.call_count();

    let outcome = service
        .move_task(&TaskId::new("missing"), "done")
        .await
        .unwrap();
    assert_eq!(outcome, MoveOutcome::NotCached);
    assert_eq!(api.call_count(), before);
}

#[tokio::test]
async fn each_mutation_triggers_exactly_one_refetch() {
    let api = Arc::new(FakeBoardApi::default());
    let service = build_service(&api);

    service
        .select_worksheet(Some(WorksheetId::new("ws-1")))
        .await
        .unwrap();

    let before = api.call_count();
    service
        .add_task(NewTask::titled("Count me", "todo"))
        .await
        .unwrap();
    // one create + one list refetch, nothing else
    assert_eq!(api.call_count(), before + 2);
}

#[tokio::test]
async fn deselecting_the_worksheet_clears_caches_without_remote_calls() {
    let api = Arc::new(FakeBoardApi::default());
    let service = build_service(&api);

    service
        .select_worksheet(Some(WorksheetId::new("ws-1")))
        .await
        .unwrap();
    service
        .add_task(NewTask::titled("Linger", "todo"))
        .await
        .unwrap();
    assert_eq!(service.tasks().len(), 1);

    let before = api.call_count();
    service.select_worksheet(None).await.unwrap();
    assert!(service.tasks().is_empty());
    assert!(service.columns().is_empty());
    assert_eq!(api.call_count(), before);
}

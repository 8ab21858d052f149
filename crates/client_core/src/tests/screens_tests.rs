use super::{
    create::{fields, CreateController, TaskDraft},
    detail::{DeleteState, DetailController, DetailView},
    edit::{EditController, EditDraft, EditView},
    list::{ListController, ListView},
    *,
};
use crate::TaskApi;

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use shared::{
    domain::{Task, TaskStatus},
    error::FieldErrors,
    protocol::{CreateTaskRequest, UpdateTaskRequest},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List,
    Get(TaskId),
    Create(CreateTaskRequest),
    Update(TaskId, UpdateTaskRequest),
    Delete(TaskId),
}

/// Records every call and answers from per-kind queues.
#[derive(Default)]
struct FakeTaskApi {
    calls: Mutex<Vec<Call>>,
    lists: Mutex<VecDeque<Result<Vec<Task>, ClientError>>>,
    reads: Mutex<VecDeque<Result<Task, ClientError>>>,
    writes: Mutex<VecDeque<Result<(), ClientError>>>,
}

impl FakeTaskApi {
    fn with_list(self, result: Result<Vec<Task>, ClientError>) -> Self {
        self.lists.lock().expect("lock").push_back(result);
        self
    }

    fn with_read(self, result: Result<Task, ClientError>) -> Self {
        self.reads.lock().expect("lock").push_back(result);
        self
    }

    fn with_write(self, result: Result<(), ClientError>) -> Self {
        self.writes.lock().expect("lock").push_back(result);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("lock").push(call);
    }
}

fn unscripted() -> ClientError {
    ClientError::Dispatch("no scripted response".to_string())
}

#[async_trait]
impl TaskApi for FakeTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.record(Call::List);
        self.lists.lock().expect("lock").pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task, ClientError> {
        self.record(Call::Get(id.clone()));
        self.reads.lock().expect("lock").pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<(), ClientError> {
        self.record(Call::Create(request.clone()));
        self.writes.lock().expect("lock").pop_front().unwrap_or(Ok(()))
    }

    async fn update_task(
        &self,
        id: &TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<(), ClientError> {
        self.record(Call::Update(id.clone(), request.clone()));
        self.writes.lock().expect("lock").pop_front().unwrap_or(Ok(()))
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ClientError> {
        self.record(Call::Delete(id.clone()));
        self.writes.lock().expect("lock").pop_front().unwrap_or(Ok(()))
    }
}

fn task(id: i64, title: &str, status: TaskStatus) -> Task {
    Task {
        id: TaskId::from(id),
        title: title.to_string(),
        description: "d".to_string(),
        status,
        due_date: None,
    }
}

fn server_error(status: u16) -> ClientError {
    ClientError::Status {
        status,
        body: String::new(),
    }
}

#[tokio::test]
async fn list_exposes_tasks_in_response_order() {
    let api = FakeTaskApi::default().with_list(Ok(vec![
        task(3, "C", TaskStatus::Completed),
        task(1, "A", TaskStatus::Pending),
        task(2, "B", TaskStatus::InProgress),
    ]));
    let mut screen = ListController::new(ScreenId::next());

    screen.load(&api).await;

    let ListView::Populated(tasks) = screen.view() else {
        panic!("expected populated view, got {:?}", screen.view());
    };
    let labels: Vec<String> = tasks.iter().map(list::row_label).collect();
    assert_eq!(labels, ["C (completed)", "A (pending)", "B (in-progress)"]);
    assert_eq!(api.calls(), [Call::List]);
}

#[tokio::test]
async fn empty_list_is_not_an_error() {
    let api = FakeTaskApi::default().with_list(Ok(Vec::new()));
    let mut screen = ListController::new(ScreenId::next());

    screen.load(&api).await;

    assert_eq!(screen.view(), ListView::Empty);
    assert_eq!(screen.create(), Route::Create);
}

#[tokio::test]
async fn list_failure_can_be_retried() {
    let api = FakeTaskApi::default()
        .with_list(Err(server_error(500)))
        .with_list(Ok(vec![task(1, "A", TaskStatus::Pending)]));
    let mut screen = ListController::new(ScreenId::next());

    screen.load(&api).await;
    assert_eq!(screen.view(), ListView::Failed(LOAD_TASKS_FAILED));

    screen.load(&api).await;
    assert!(matches!(screen.view(), ListView::Populated(tasks) if tasks.len() == 1));
    assert_eq!(api.calls(), [Call::List, Call::List]);
}

#[test]
fn response_after_unmount_is_ignored() {
    let mut screen = ListController::new(ScreenId::next());
    let ticket = screen.activate();

    screen.unmount();
    let applied = screen.apply_loaded(ticket, Ok(vec![task(1, "A", TaskStatus::Pending)]));

    assert!(!applied);
    assert!(screen.state().is_loading());
}

#[test]
fn superseded_ticket_is_ignored() {
    let mut screen = ListController::new(ScreenId::next());
    let first = screen.activate();
    let second = screen.activate();

    assert!(!screen.apply_loaded(first, Ok(vec![task(1, "Old", TaskStatus::Pending)])));
    assert!(screen.apply_loaded(second, Ok(Vec::new())));
    assert_eq!(screen.view(), ListView::Empty);
    assert!(!screen.apply_loaded(second, Err(server_error(500))), "tickets are single-use");
}

#[test]
fn tickets_from_another_screen_are_rejected() {
    let mut first = ListController::new(ScreenId::next());
    let mut second = ListController::new(ScreenId::next());
    let foreign = first.activate();
    let own = second.activate();

    assert_ne!(foreign.screen(), own.screen());
    assert!(!second.apply_loaded(foreign, Ok(Vec::new())));
    assert!(second.apply_loaded(own, Ok(Vec::new())));
}

#[test]
fn create_draft_starts_blank_and_pending() {
    let screen = CreateController::new(ScreenId::next());
    assert_eq!(
        screen.draft,
        TaskDraft {
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            due_date: String::new(),
        }
    );
    assert!(screen.field_errors().is_empty());
    assert_eq!(screen.error(), None);
}

#[tokio::test]
async fn create_sends_null_for_blank_due_date_and_navigates() {
    let api = FakeTaskApi::default();
    let mut screen = CreateController::new(ScreenId::next());
    screen.draft.title = "Write report".to_string();
    screen.draft.due_date = "   ".to_string();

    let route = screen.run_submit(&api).await;

    assert_eq!(route, Some(Route::List));
    assert_eq!(
        api.calls(),
        [Call::Create(CreateTaskRequest {
            title: "Write report".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            due_date: None,
        })]
    );
}

#[tokio::test]
async fn create_rejects_unparseable_due_date_without_a_request() {
    let api = FakeTaskApi::default();
    let mut screen = CreateController::new(ScreenId::next());
    screen.draft.title = "Plan".to_string();
    screen.draft.due_date = "tomorrow".to_string();

    let route = screen.run_submit(&api).await;

    assert_eq!(route, None);
    assert!(api.calls().is_empty());
    assert!(screen.field_error(fields::DUE_DATE).is_some());
    assert!(!screen.is_submitting());
}

#[tokio::test]
async fn create_validation_failure_shows_first_message_per_field() {
    let errors: FieldErrors = [
        ("title", "Title is required"),
        ("title", "Title must be a string"),
    ]
    .into_iter()
    .collect();
    let api = FakeTaskApi::default().with_write(Err(ClientError::Validation(errors)));
    let mut screen = CreateController::new(ScreenId::next());
    screen.draft.description = "keep me".to_string();
    screen.draft.status = TaskStatus::Completed;
    let before = screen.draft.clone();

    let route = screen.run_submit(&api).await;

    assert_eq!(route, None);
    assert_eq!(screen.field_error(fields::TITLE), Some("Title is required"));
    assert_eq!(screen.field_error(fields::DESCRIPTION), None);
    assert_eq!(screen.error(), None);
    assert_eq!(screen.draft, before);
    assert!(!screen.is_submitting());
}

#[tokio::test]
async fn create_clears_stale_field_errors_on_resubmit() {
    let errors: FieldErrors = [("title", "required")].into_iter().collect();
    let api = FakeTaskApi::default()
        .with_write(Err(ClientError::Validation(errors)))
        .with_write(Err(server_error(500)));
    let mut screen = CreateController::new(ScreenId::next());

    screen.run_submit(&api).await;
    assert_eq!(screen.field_error(fields::TITLE), Some("required"));

    screen.draft.title = "Now titled".to_string();
    screen.run_submit(&api).await;
    assert_eq!(screen.field_error(fields::TITLE), None);
    assert_eq!(screen.error(), Some(CREATE_FAILED));
}

#[test]
fn create_refuses_second_submit_while_in_flight() {
    let mut screen = CreateController::new(ScreenId::next());
    screen.draft.title = "Once".to_string();

    let (ticket, _) = screen.submit().expect("first submit");
    assert!(screen.is_submitting());
    assert!(screen.submit().is_none());

    assert_eq!(screen.apply_created(ticket, Ok(())), Some(Route::List));
}

#[tokio::test]
async fn delete_intent_alone_issues_no_request() {
    let api = FakeTaskApi::default().with_read(Ok(task(5, "Five", TaskStatus::Pending)));
    let mut screen = DetailController::new(ScreenId::next(), TaskId::from(5));
    screen.load(&api).await;

    assert!(screen.request_delete());
    match screen.view() {
        DetailView::Ready { task, confirm, .. } => {
            assert_eq!(task.title, "Five", "content stays visible under the dialog");
            let dialog = confirm.expect("dialog open");
            assert!(!dialog.deleting);
            assert!(dialog.prompt().contains("\"Five\""));
        }
        other => panic!("unexpected view: {other:?}"),
    }
    assert!(screen.cancel_delete());

    assert_eq!(screen.run_delete(&api).await, None);
    assert_eq!(api.calls(), [Call::Get(TaskId::from(5))]);
}

#[tokio::test]
async fn confirmed_delete_navigates_to_list() {
    let api = FakeTaskApi::default().with_read(Ok(task(5, "Five", TaskStatus::Pending)));
    let mut screen = DetailController::new(ScreenId::next(), TaskId::from(5));
    screen.load(&api).await;

    screen.request_delete();
    let route = screen.run_delete(&api).await;

    assert_eq!(route, Some(Route::List));
    assert_eq!(
        api.calls(),
        [Call::Get(TaskId::from(5)), Call::Delete(TaskId::from(5))]
    );
}

#[test]
fn delete_controls_are_locked_while_deleting() {
    let mut screen = DetailController::new(ScreenId::next(), TaskId::from(5));
    let load = screen.activate();
    screen.apply_loaded(load, Ok(task(5, "Five", TaskStatus::Pending)));

    screen.request_delete();
    let ticket = screen.confirm_delete().expect("confirm");

    assert!(screen.is_deleting());
    assert!(!screen.cancel_delete());
    assert!(screen.confirm_delete().is_none());
    assert!(!screen.request_delete());

    assert_eq!(screen.apply_deleted(ticket, Err(server_error(500))), None);
    assert_eq!(
        screen.delete_state(),
        &DeleteState::Closed {
            error: Some(DELETE_FAILED.to_string())
        }
    );
    assert!(screen.request_delete());
}

#[tokio::test]
async fn detail_load_outcomes_never_stay_loading() {
    let api = FakeTaskApi::default()
        .with_read(Err(ClientError::NotFound(TaskId::from(8))))
        .with_read(Err(server_error(503)))
        .with_read(Ok(task(8, "Eight", TaskStatus::Completed)));
    let mut screen = DetailController::new(ScreenId::next(), TaskId::from(8));

    screen.load(&api).await;
    assert_eq!(screen.view(), DetailView::Failed(TASK_NOT_FOUND));
    assert!(!screen.request_delete());

    screen.load(&api).await;
    assert_eq!(screen.view(), DetailView::Failed(LOAD_TASK_FAILED));

    screen.load(&api).await;
    assert!(matches!(screen.view(), DetailView::Ready { task, error: None, confirm: None } if task.title == "Eight"));
}

#[test]
fn edit_action_is_pure_navigation() {
    let screen = DetailController::new(ScreenId::next(), TaskId::from(12));
    assert_eq!(screen.edit(), Route::Edit(TaskId::from(12)));
    assert_eq!(screen.edit().path(), "/tasks/12/edit");
    assert_eq!(screen.view(), DetailView::Loading);
}

#[tokio::test]
async fn edit_prefills_title_and_description() {
    let mut loaded = task(4, "Four", TaskStatus::InProgress);
    loaded.description = "original".to_string();
    let api = FakeTaskApi::default().with_read(Ok(loaded));
    let mut screen = EditController::new(ScreenId::next(), TaskId::from(4));

    screen.load(&api).await;

    assert_eq!(
        screen.draft(),
        Some(&EditDraft {
            title: "Four".to_string(),
            description: "original".to_string(),
        })
    );
}

#[tokio::test]
async fn resubmitting_unchanged_edit_is_idempotent() {
    let api = FakeTaskApi::default().with_read(Ok(task(4, "Four", TaskStatus::Pending)));
    let mut screen = EditController::new(ScreenId::next(), TaskId::from(4));
    screen.load(&api).await;

    let first = screen.run_submit(&api).await;
    let second = screen.run_submit(&api).await;

    assert_eq!(first, Some(Route::List));
    assert_eq!(first, second);
    let updates: Vec<Call> = api
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Update(..)))
        .collect();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0], updates[1]);
    assert_eq!(screen.draft().map(|d| d.title.as_str()), Some("Four"));
}

#[tokio::test]
async fn failed_update_keeps_draft_and_reenables_submit() {
    let api = FakeTaskApi::default()
        .with_read(Ok(task(4, "Four", TaskStatus::Pending)))
        .with_write(Err(server_error(500)));
    let mut screen = EditController::new(ScreenId::next(), TaskId::from(4));
    screen.load(&api).await;
    if let Some(draft) = screen.draft_mut() {
        draft.title = "Four, revised".to_string();
    }

    let route = screen.run_submit(&api).await;

    assert_eq!(route, None);
    match screen.view() {
        EditView::Ready {
            draft,
            saving,
            error,
        } => {
            assert_eq!(draft.title, "Four, revised");
            assert!(!saving);
            assert_eq!(error, Some(UPDATE_FAILED));
        }
        other => panic!("unexpected view: {other:?}"),
    }
    assert!(screen.submit().is_some(), "user can retry");
}

#[test]
fn edit_submit_waits_for_load_and_blocks_duplicates() {
    let mut screen = EditController::new(ScreenId::next(), TaskId::from(4));
    assert!(screen.submit().is_none());

    let load = screen.activate();
    screen.apply_loaded(load, Ok(task(4, "Four", TaskStatus::Pending)));
    let (ticket, request) = screen.submit().expect("submit");
    assert!(screen.is_saving());
    assert!(screen.submit().is_none());
    assert_eq!(request.title, "Four");

    screen.unmount();
    assert_eq!(screen.apply_saved(ticket, Ok(())), None);
}

#[tokio::test]
async fn edit_load_failure_offers_no_form() {
    let api = FakeTaskApi::default().with_read(Err(server_error(500)));
    let mut screen = EditController::new(ScreenId::next(), TaskId::from(4));

    screen.load(&api).await;

    assert_eq!(screen.view(), EditView::Failed(LOAD_TASK_FAILED));
    assert!(screen.submit().is_none());
    assert_eq!(screen.back(), Route::List);
}

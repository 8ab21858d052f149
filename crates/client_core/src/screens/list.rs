use shared::domain::Task;
use tracing::debug;

use super::{report_failure, RequestGuard, RequestState, Route, ScreenId, Ticket, LOAD_TASKS_FAILED};
use crate::{error::ClientError, TaskApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView<'a> {
    Loading,
    Failed(&'a str),
    /// Loaded, nothing to show yet: invite the user to create a first task.
    Empty,
    Populated(&'a [Task]),
}

/// Row caption, e.g. `A (pending)`.
pub fn row_label(task: &Task) -> String {
    format!("{} ({})", task.title, task.status)
}

#[derive(Debug)]
pub struct ListController {
    guard: RequestGuard,
    tasks: RequestState<Vec<Task>>,
}

impl ListController {
    pub fn new(screen: ScreenId) -> Self {
        Self {
            guard: RequestGuard::new(screen),
            tasks: RequestState::Idle,
        }
    }

    /// Starts (or restarts, on retry) the collection read.
    pub fn activate(&mut self) -> Ticket {
        self.tasks = RequestState::Loading;
        self.guard.issue()
    }

    pub fn apply_loaded(&mut self, ticket: Ticket, result: Result<Vec<Task>, ClientError>) -> bool {
        if !self.guard.accept(ticket) {
            return false;
        }
        self.tasks = match result {
            Ok(tasks) => {
                debug!(count = tasks.len(), "task list loaded");
                RequestState::Loaded(tasks)
            }
            Err(err) => {
                report_failure("list tasks", &err);
                RequestState::Failed(LOAD_TASKS_FAILED.to_string())
            }
        };
        true
    }

    pub fn state(&self) -> &RequestState<Vec<Task>> {
        &self.tasks
    }

    pub fn view(&self) -> ListView<'_> {
        match &self.tasks {
            RequestState::Idle | RequestState::Loading => ListView::Loading,
            RequestState::Failed(message) => ListView::Failed(message),
            RequestState::Loaded(tasks) if tasks.is_empty() => ListView::Empty,
            RequestState::Loaded(tasks) => ListView::Populated(tasks),
        }
    }

    pub fn open(&self, task: &Task) -> Route {
        Route::Detail(task.id.clone())
    }

    pub fn create(&self) -> Route {
        Route::Create
    }

    pub fn unmount(&mut self) {
        self.guard.unmount();
    }

    pub async fn load<A: TaskApi + ?Sized>(&mut self, api: &A) {
        let ticket = self.activate();
        let result = api.list_tasks().await;
        self.apply_loaded(ticket, result);
    }
}

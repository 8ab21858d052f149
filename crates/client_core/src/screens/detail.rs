use shared::domain::{Task, TaskId};
use tracing::info;

use super::{
    load_failure_message, report_failure, RequestGuard, RequestState, Route, ScreenId, Ticket,
    DELETE_FAILED,
};
use crate::{error::ClientError, TaskApi};

/// Delete flow. The error of a failed attempt only exists while the gate is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState {
    Closed { error: Option<String> },
    Confirming,
    Deleting,
}

impl Default for DeleteState {
    fn default() -> Self {
        Self::Closed { error: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmDialog<'a> {
    pub title: &'a str,
    /// Confirm and cancel are disabled while set.
    pub deleting: bool,
}

impl ConfirmDialog<'_> {
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            self.title
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailView<'a> {
    Loading,
    Failed(&'a str),
    Ready {
        task: &'a Task,
        error: Option<&'a str>,
        confirm: Option<ConfirmDialog<'a>>,
    },
}

#[derive(Debug)]
pub struct DetailController {
    id: TaskId,
    load_guard: RequestGuard,
    delete_guard: RequestGuard,
    task: RequestState<Task>,
    delete: DeleteState,
}

impl DetailController {
    pub fn new(screen: ScreenId, id: TaskId) -> Self {
        Self {
            id,
            load_guard: RequestGuard::new(screen),
            delete_guard: RequestGuard::new(screen),
            task: RequestState::Idle,
            delete: DeleteState::default(),
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn activate(&mut self) -> Ticket {
        self.task = RequestState::Loading;
        self.delete = DeleteState::default();
        self.load_guard.issue()
    }

    pub fn apply_loaded(&mut self, ticket: Ticket, result: Result<Task, ClientError>) -> bool {
        if !self.load_guard.accept(ticket) {
            return false;
        }
        self.task = match result {
            Ok(task) => RequestState::Loaded(task),
            Err(err) => RequestState::Failed(load_failure_message(&err)),
        };
        true
    }

    pub fn state(&self) -> &RequestState<Task> {
        &self.task
    }

    pub fn delete_state(&self) -> &DeleteState {
        &self.delete
    }

    pub fn view(&self) -> DetailView<'_> {
        match &self.task {
            RequestState::Idle | RequestState::Loading => DetailView::Loading,
            RequestState::Failed(message) => DetailView::Failed(message),
            RequestState::Loaded(task) => {
                let dialog = |deleting| ConfirmDialog {
                    title: &task.title,
                    deleting,
                };
                let (error, confirm) = match &self.delete {
                    DeleteState::Closed { error } => (error.as_deref(), None),
                    DeleteState::Confirming => (None, Some(dialog(false))),
                    DeleteState::Deleting => (None, Some(dialog(true))),
                };
                DetailView::Ready {
                    task,
                    error,
                    confirm,
                }
            }
        }
    }

    /// Opens the confirmation gate. Issues nothing.
    pub fn request_delete(&mut self) -> bool {
        if self.task.loaded().is_none() || !matches!(self.delete, DeleteState::Closed { .. }) {
            return false;
        }
        self.delete = DeleteState::Confirming;
        true
    }

    pub fn cancel_delete(&mut self) -> bool {
        if self.delete != DeleteState::Confirming {
            return false;
        }
        self.delete = DeleteState::default();
        true
    }

    pub fn confirm_delete(&mut self) -> Option<Ticket> {
        if self.delete != DeleteState::Confirming {
            return None;
        }
        self.delete = DeleteState::Deleting;
        Some(self.delete_guard.issue())
    }

    pub fn is_deleting(&self) -> bool {
        self.delete == DeleteState::Deleting
    }

    pub fn apply_deleted(&mut self, ticket: Ticket, result: Result<(), ClientError>) -> Option<Route> {
        if !self.delete_guard.accept(ticket) {
            return None;
        }
        match result {
            Ok(()) => {
                info!(id = %self.id, "task deleted");
                Some(Route::List)
            }
            Err(err) => {
                report_failure("delete task", &err);
                self.delete = DeleteState::Closed {
                    error: Some(DELETE_FAILED.to_string()),
                };
                None
            }
        }
    }

    pub fn edit(&self) -> Route {
        Route::Edit(self.id.clone())
    }

    pub fn back(&self) -> Route {
        Route::List
    }

    pub fn unmount(&mut self) {
        self.load_guard.unmount();
        self.delete_guard.unmount();
    }

    pub async fn load<A: TaskApi + ?Sized>(&mut self, api: &A) {
        let ticket = self.activate();
        let result = api.get_task(&self.id).await;
        self.apply_loaded(ticket, result);
    }

    /// Only does anything once the gate has been opened with [`Self::request_delete`].
    pub async fn run_delete<A: TaskApi + ?Sized>(&mut self, api: &A) -> Option<Route> {
        let ticket = self.confirm_delete()?;
        let result = api.delete_task(&self.id).await;
        self.apply_deleted(ticket, result)
    }
}

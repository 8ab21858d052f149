use shared::{
    domain::{Task, TaskId},
    protocol::UpdateTaskRequest,
};
use tracing::info;

use super::{
    load_failure_message, report_failure, RequestGuard, RequestState, Route, ScreenId, Ticket,
    UPDATE_FAILED,
};
use crate::{error::ClientError, TaskApi};

/// Editable subset of an existing task. Status and due date stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDraft {
    pub title: String,
    pub description: String,
}

impl From<&Task> for EditDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
        }
    }
}

impl EditDraft {
    pub fn to_request(&self) -> UpdateTaskRequest {
        UpdateTaskRequest {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum EditView<'a> {
    Loading,
    Failed(&'a str),
    Ready {
        draft: &'a EditDraft,
        saving: bool,
        error: Option<&'a str>,
    },
}

#[derive(Debug)]
pub struct EditController {
    id: TaskId,
    load_guard: RequestGuard,
    save_guard: RequestGuard,
    form: RequestState<EditDraft>,
    save: RequestState<()>,
}

impl EditController {
    pub fn new(screen: ScreenId, id: TaskId) -> Self {
        Self {
            id,
            load_guard: RequestGuard::new(screen),
            save_guard: RequestGuard::new(screen),
            form: RequestState::Idle,
            save: RequestState::Idle,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn activate(&mut self) -> Ticket {
        self.form = RequestState::Loading;
        self.save = RequestState::Idle;
        self.load_guard.issue()
    }

    pub fn apply_loaded(&mut self, ticket: Ticket, result: Result<Task, ClientError>) -> bool {
        if !self.load_guard.accept(ticket) {
            return false;
        }
        self.form = match result {
            Ok(task) => RequestState::Loaded(EditDraft::from(&task)),
            Err(err) => RequestState::Failed(load_failure_message(&err)),
        };
        true
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.form.loaded()
    }

    pub fn draft_mut(&mut self) -> Option<&mut EditDraft> {
        self.form.loaded_mut()
    }

    pub fn view(&self) -> EditView<'_> {
        match &self.form {
            RequestState::Idle | RequestState::Loading => EditView::Loading,
            RequestState::Failed(message) => EditView::Failed(message),
            RequestState::Loaded(draft) => EditView::Ready {
                draft,
                saving: self.save.is_loading(),
                error: self.save.error(),
            },
        }
    }

    /// Refused until the task has loaded and while a save is in flight.
    pub fn submit(&mut self) -> Option<(Ticket, UpdateTaskRequest)> {
        if self.save.is_loading() {
            return None;
        }
        let request = self.form.loaded()?.to_request();
        self.save = RequestState::Loading;
        Some((self.save_guard.issue(), request))
    }

    pub fn apply_saved(&mut self, ticket: Ticket, result: Result<(), ClientError>) -> Option<Route> {
        if !self.save_guard.accept(ticket) {
            return None;
        }
        match result {
            Ok(()) => {
                info!(id = %self.id, "task updated");
                self.save = RequestState::Loaded(());
                Some(Route::List)
            }
            Err(err) => {
                report_failure("update task", &err);
                self.save = RequestState::Failed(UPDATE_FAILED.to_string());
                None
            }
        }
    }

    pub fn is_saving(&self) -> bool {
        self.save.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.save.error()
    }

    pub fn back(&self) -> Route {
        Route::List
    }

    pub fn unmount(&mut self) {
        self.load_guard.unmount();
        self.save_guard.unmount();
    }

    pub async fn load<A: TaskApi + ?Sized>(&mut self, api: &A) {
        let ticket = self.activate();
        let result = api.get_task(&self.id).await;
        self.apply_loaded(ticket, result);
    }

    pub async fn run_submit<A: TaskApi + ?Sized>(&mut self, api: &A) -> Option<Route> {
        let (ticket, request) = self.submit()?;
        let result = api.update_task(&self.id, &request).await;
        self.apply_saved(ticket, result)
    }
}

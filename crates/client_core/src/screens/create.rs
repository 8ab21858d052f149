use shared::{
    domain::{parse_due_date, TaskStatus},
    error::FieldErrors,
    protocol::CreateTaskRequest,
};
use tracing::{info, warn};

use super::{report_failure, RequestGuard, RequestState, Route, ScreenId, Ticket, CREATE_FAILED};
use crate::{error::ClientError, TaskApi};

pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const STATUS: &str = "status";
    pub const DUE_DATE: &str = "due_date";
}

/// Form values of a task that does not exist yet. `due_date` is raw input text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: String,
}

impl TaskDraft {
    /// Blank due date becomes `None`; unparseable dates come back as a `due_date` field error.
    pub fn to_request(&self) -> Result<CreateTaskRequest, FieldErrors> {
        let due_date = match self.due_date.trim() {
            "" => None,
            raw => Some(
                parse_due_date(raw)
                    .map_err(|err| FieldErrors::from_iter([(fields::DUE_DATE, err.to_string())]))?,
            ),
        };

        Ok(CreateTaskRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            due_date,
        })
    }
}

#[derive(Debug)]
pub struct CreateController {
    guard: RequestGuard,
    pub draft: TaskDraft,
    field_errors: FieldErrors,
    submission: RequestState<()>,
}

impl CreateController {
    pub fn new(screen: ScreenId) -> Self {
        Self {
            guard: RequestGuard::new(screen),
            draft: TaskDraft::default(),
            field_errors: FieldErrors::new(),
            submission: RequestState::Idle,
        }
    }

    /// Refused while a create is in flight or when the draft fails local checks.
    pub fn submit(&mut self) -> Option<(Ticket, CreateTaskRequest)> {
        if self.submission.is_loading() {
            return None;
        }
        self.field_errors.clear();
        self.submission = RequestState::Idle;

        match self.draft.to_request() {
            Ok(request) => {
                self.submission = RequestState::Loading;
                Some((self.guard.issue(), request))
            }
            Err(errors) => {
                self.field_errors = errors;
                None
            }
        }
    }

    pub fn apply_created(&mut self, ticket: Ticket, result: Result<(), ClientError>) -> Option<Route> {
        if !self.guard.accept(ticket) {
            return None;
        }
        match result {
            Ok(()) => {
                info!(title = %self.draft.title, "task created");
                self.submission = RequestState::Loaded(());
                Some(Route::List)
            }
            Err(ClientError::Validation(errors)) => {
                warn!(fields = errors.len(), "create rejected by server validation");
                self.field_errors = errors;
                self.submission = RequestState::Idle;
                None
            }
            Err(err) => {
                report_failure("create task", &err);
                self.submission = RequestState::Failed(CREATE_FAILED.to_string());
                None
            }
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.first(field)
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn error(&self) -> Option<&str> {
        self.submission.error()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_loading()
    }

    pub fn back(&self) -> Route {
        Route::List
    }

    pub fn unmount(&mut self) {
        self.guard.unmount();
    }

    pub async fn run_submit<A: TaskApi + ?Sized>(&mut self, api: &A) -> Option<Route> {
        let (ticket, request) = self.submit()?;
        let result = api.create_task(&request).await;
        self.apply_created(ticket, result)
    }
}

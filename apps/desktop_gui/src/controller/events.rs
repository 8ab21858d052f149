//! Events sent from the backend worker to the UI thread.

use client_core::{ClientError, Ticket};
use shared::domain::Task;

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug)]
pub enum UiEvent {
    /// The worker could not start; every later command fails to dispatch.
    BackendStopped(String),
    TasksLoaded {
        ticket: Ticket,
        result: Result<Vec<Task>, ClientError>,
    },
    TaskLoaded {
        ticket: Ticket,
        result: Result<Task, ClientError>,
    },
    TaskCreated {
        ticket: Ticket,
        result: Result<(), ClientError>,
    },
    TaskUpdated {
        ticket: Ticket,
        result: Result<(), ClientError>,
    },
    TaskDeleted {
        ticket: Ticket,
        result: Result<(), ClientError>,
    },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BackendStopped(_) => "backend_stopped",
            Self::TasksLoaded { .. } => "tasks_loaded",
            Self::TaskLoaded { .. } => "task_loaded",
            Self::TaskCreated { .. } => "task_created",
            Self::TaskUpdated { .. } => "task_updated",
            Self::TaskDeleted { .. } => "task_deleted",
        }
    }

    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Self::BackendStopped(_) => None,
            Self::TasksLoaded { ticket, .. }
            | Self::TaskLoaded { ticket, .. }
            | Self::TaskCreated { ticket, .. }
            | Self::TaskUpdated { ticket, .. }
            | Self::TaskDeleted { ticket, .. } => Some(*ticket),
        }
    }

    /// The response for a command that never reached the worker.
    pub fn dispatch_failed(cmd: BackendCommand, reason: &str) -> Self {
        match cmd {
            BackendCommand::ListTasks { ticket } => Self::TasksLoaded {
                ticket,
                result: dispatch_error(reason),
            },
            BackendCommand::FetchTask { ticket, .. } => Self::TaskLoaded {
                ticket,
                result: dispatch_error(reason),
            },
            BackendCommand::CreateTask { ticket, .. } => Self::TaskCreated {
                ticket,
                result: dispatch_error(reason),
            },
            BackendCommand::UpdateTask { ticket, .. } => Self::TaskUpdated {
                ticket,
                result: dispatch_error(reason),
            },
            BackendCommand::DeleteTask { ticket, .. } => Self::TaskDeleted {
                ticket,
                result: dispatch_error(reason),
            },
        }
    }
}

fn dispatch_error<T>(reason: &str) -> Result<T, ClientError> {
    Err(ClientError::Dispatch(reason.to_string()))
}

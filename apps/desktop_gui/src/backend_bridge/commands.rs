//! Commands queued by the UI thread for the backend worker.

use client_core::Ticket;
use shared::{
    domain::TaskId,
    protocol::{CreateTaskRequest, UpdateTaskRequest},
};

/// Every command carries the ticket of the screen request it answers.
#[derive(Debug, Clone)]
pub enum BackendCommand {
    ListTasks {
        ticket: Ticket,
    },
    FetchTask {
        ticket: Ticket,
        id: TaskId,
    },
    CreateTask {
        ticket: Ticket,
        request: CreateTaskRequest,
    },
    UpdateTask {
        ticket: Ticket,
        id: TaskId,
        request: UpdateTaskRequest,
    },
    DeleteTask {
        ticket: Ticket,
        id: TaskId,
    },
}

impl BackendCommand {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::ListTasks { ticket }
            | Self::FetchTask { ticket, .. }
            | Self::CreateTask { ticket, .. }
            | Self::UpdateTask { ticket, .. }
            | Self::DeleteTask { ticket, .. } => *ticket,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ListTasks { .. } => "list_tasks",
            Self::FetchTask { .. } => "fetch_task",
            Self::CreateTask { .. } => "create_task",
            Self::UpdateTask { .. } => "update_task",
            Self::DeleteTask { .. } => "delete_task",
        }
    }
}

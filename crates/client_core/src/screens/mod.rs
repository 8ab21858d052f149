//! Screen controllers: one self-contained state machine per page.
//!
//! Every request goes through the same shape. A `begin` step moves the
//! controller into its loading state and hands out a [`Ticket`]; the caller
//! performs the request however it likes (inline `await` or a background
//! worker) and feeds the outcome back together with that ticket. Outcomes
//! whose ticket is not the outstanding one, or that arrive after the screen
//! was unmounted, are dropped without touching state.

use std::sync::atomic::{AtomicU64, Ordering};

use shared::domain::TaskId;
use tracing::{debug, error, warn};

use crate::error::ClientError;

pub mod create;
pub mod detail;
pub mod edit;
pub mod list;

pub const LOAD_TASKS_FAILED: &str = "Failed to load tasks. Please try again.";
pub const LOAD_TASK_FAILED: &str = "Error loading task. Please try again.";
pub const TASK_NOT_FOUND: &str = "Task not found";
pub const CREATE_FAILED: &str = "Error creating task. Please try again.";
pub const UPDATE_FAILED: &str = "Error updating task. Please try again.";
pub const DELETE_FAILED: &str = "Error deleting task. Please try again.";

static NEXT_SCREEN: AtomicU64 = AtomicU64::new(1);
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Create,
    Detail(TaskId),
    Edit(TaskId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::List => "/tasks".to_string(),
            Self::Create => "/tasks/create".to_string(),
            Self::Detail(id) => format!("/tasks/{id}"),
            Self::Edit(id) => format!("/tasks/{id}/edit"),
        }
    }
}

/// Identity of one mounted screen instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(u64);

impl ScreenId {
    pub fn next() -> Self {
        Self(NEXT_SCREEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of one outgoing request. Sequence numbers are process-unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    screen: ScreenId,
    seq: u64,
}

impl Ticket {
    pub fn screen(&self) -> ScreenId {
        self.screen
    }
}

/// Tracks the single outstanding request of one kind for a screen.
#[derive(Debug)]
pub struct RequestGuard {
    screen: ScreenId,
    outstanding: Option<Ticket>,
    mounted: bool,
}

impl RequestGuard {
    pub fn new(screen: ScreenId) -> Self {
        Self {
            screen,
            outstanding: None,
            mounted: true,
        }
    }

    /// Supersedes any earlier outstanding ticket.
    pub fn issue(&mut self) -> Ticket {
        let ticket = Ticket {
            screen: self.screen,
            seq: NEXT_TICKET.fetch_add(1, Ordering::Relaxed),
        };
        self.outstanding = Some(ticket);
        ticket
    }

    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if self.mounted && self.outstanding == Some(ticket) {
            self.outstanding = None;
            return true;
        }
        debug!(
            ?ticket,
            screen = ?self.screen,
            mounted = self.mounted,
            "dropping stale response"
        );
        false
    }

    pub fn in_flight(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.outstanding = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

fn report_failure(action: &'static str, err: &ClientError) {
    error!(action, error = %err, "task request failed");
}

/// Single-task reads: not-found gets its own message, everything else the generic one.
fn load_failure_message(err: &ClientError) -> String {
    if err.is_not_found() {
        warn!(error = %err, "task lookup returned nothing");
        TASK_NOT_FOUND.to_string()
    } else {
        report_failure("load task", err);
        LOAD_TASK_FAILED.to_string()
    }
}

#[cfg(test)]
#[path = "../tests/screens_tests.rs"]
mod tests;

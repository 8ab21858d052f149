//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Queues `cmd` for the worker. When it cannot be queued, returns the failure
/// event the UI should apply in place of a response.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Option<UiEvent> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            None
        }
        Err(TrySendError::Full(cmd)) => {
            tracing::warn!(command = cmd_name, "ui command queue is full");
            Some(UiEvent::dispatch_failed(
                cmd,
                "UI command queue is full; please retry",
            ))
        }
        Err(TrySendError::Disconnected(cmd)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Some(UiEvent::dispatch_failed(
                cmd,
                "Backend command processor disconnected (possible startup/runtime failure)",
            ))
        }
    }
}

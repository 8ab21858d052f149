//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientConfig, HttpTaskClient, TaskApi};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Spawns the worker thread. Each command runs as its own task so a slow
/// request never holds up the queue.
pub fn launch(
    config: ClientConfig,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    repaint: egui::Context,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let reason = format!("backend worker startup failure: failed to build runtime: {err}");
                stop(&cmd_rx, &ui_tx, &repaint, reason);
                return;
            }
        };

        let client: Arc<dyn TaskApi> = match HttpTaskClient::new(config) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                let reason = format!("backend worker startup failure: {err:#}");
                stop(&cmd_rx, &ui_tx, &repaint, reason);
                return;
            }
        };

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let client = Arc::clone(&client);
                let ui_tx = ui_tx.clone();
                let repaint = repaint.clone();
                tokio::spawn(async move {
                    let event = execute(client.as_ref(), cmd).await;
                    if deliver(&ui_tx, event) {
                        repaint.request_repaint();
                    }
                });
            }
            tracing::debug!("ui command queue closed; backend worker exiting");
        });
    });
}

/// Answers every command already queued with a failure, then reports the stop.
/// The UI fails anything it queues afterwards on its own.
pub fn stop(
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
    repaint: &egui::Context,
    reason: String,
) {
    tracing::error!("{reason}");
    for cmd in cmd_rx.try_iter() {
        let _ = ui_tx.send(UiEvent::dispatch_failed(cmd, &reason));
    }
    let _ = ui_tx.send(UiEvent::BackendStopped(reason));
    repaint.request_repaint();
}

/// Every response must reach the UI, otherwise its screen never leaves the
/// in-flight state. A full queue makes the task wait for the UI to drain it.
fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            tracing::warn!(event = event.name(), "ui event queue is full; waiting for room");
            tokio::task::block_in_place(|| ui_tx.send(event)).is_ok()
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui closed before the response arrived");
            false
        }
    }
}

pub async fn execute(client: &dyn TaskApi, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::ListTasks { ticket } => UiEvent::TasksLoaded {
            ticket,
            result: client.list_tasks().await,
        },
        BackendCommand::FetchTask { ticket, id } => UiEvent::TaskLoaded {
            ticket,
            result: client.get_task(&id).await,
        },
        BackendCommand::CreateTask { ticket, request } => UiEvent::TaskCreated {
            ticket,
            result: client.create_task(&request).await,
        },
        BackendCommand::UpdateTask {
            ticket,
            id,
            request,
        } => UiEvent::TaskUpdated {
            ticket,
            result: client.update_task(&id, &request).await,
        },
        BackendCommand::DeleteTask { ticket, id } => UiEvent::TaskDeleted {
            ticket,
            result: client.delete_task(&id).await,
        },
    }
}

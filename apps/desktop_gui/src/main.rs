mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use client_core::{load_settings, ClientConfig};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::TasksApp;

#[derive(Parser, Debug)]
#[command(name = "tasks-gui", about = "Desktop task manager")]
struct Args {
    /// Base URL of the tasks API, e.g. http://127.0.0.1:8000/api
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    let config = ClientConfig::from_settings(&settings)?;
    tracing::info!(api_url = %config.api_url, "starting task manager");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Task Manager")
            .with_inner_size([760.0, 640.0])
            .with_min_inner_size([480.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Task Manager",
        options,
        Box::new(move |cc| {
            backend_bridge::runtime::launch(config, cmd_rx, ui_tx, cc.egui_ctx.clone());
            Ok(Box::new(TasksApp::new(cmd_tx, ui_rx)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("task manager window failed: {err}"))
}

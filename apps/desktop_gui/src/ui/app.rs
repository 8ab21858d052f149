use std::{collections::HashMap, time::Duration};

use client_core::{
    CreateController, DetailController, EditController, ListController, Route, ScreenId, Ticket,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui::{self, Color32};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};
use crate::ui::screens::{self, Intent};

/// The mounted page. Exactly one is alive at a time.
#[derive(Debug)]
pub(crate) enum Screen {
    List(ListController),
    Create(CreateController),
    Detail(DetailController),
    Edit(EditController),
}

impl Screen {
    /// Builds a fresh controller for `route` plus the load it needs on mount.
    fn mount(route: Route) -> (Self, Option<BackendCommand>) {
        let screen_id = ScreenId::next();
        match route {
            Route::List => {
                let mut screen = ListController::new(screen_id);
                let ticket = screen.activate();
                (Self::List(screen), Some(BackendCommand::ListTasks { ticket }))
            }
            Route::Create => (Self::Create(CreateController::new(screen_id)), None),
            Route::Detail(id) => {
                let mut screen = DetailController::new(screen_id, id.clone());
                let ticket = screen.activate();
                (
                    Self::Detail(screen),
                    Some(BackendCommand::FetchTask { ticket, id }),
                )
            }
            Route::Edit(id) => {
                let mut screen = EditController::new(screen_id, id.clone());
                let ticket = screen.activate();
                (
                    Self::Edit(screen),
                    Some(BackendCommand::FetchTask { ticket, id }),
                )
            }
        }
    }

    fn unmount(&mut self) {
        match self {
            Self::List(screen) => screen.unmount(),
            Self::Create(screen) => screen.unmount(),
            Self::Detail(screen) => screen.unmount(),
            Self::Edit(screen) => screen.unmount(),
        }
    }
}

pub struct TasksApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    screen: Screen,
    /// Commands of the mounted screen still waiting for a response.
    in_flight: HashMap<Ticket, BackendCommand>,
    backend_error: Option<String>,
}

impl TasksApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let (screen, load) = Screen::mount(Route::List);
        let mut app = Self {
            cmd_tx,
            ui_rx,
            screen,
            in_flight: HashMap::new(),
            backend_error: None,
        };
        if let Some(cmd) = load {
            app.dispatch(cmd);
        }
        app
    }

    fn navigate(&mut self, route: Route) {
        tracing::debug!(path = %route.path(), "navigating");
        self.screen.unmount();
        self.in_flight.clear();
        let (screen, load) = Screen::mount(route);
        self.screen = screen;
        if let Some(cmd) = load {
            self.dispatch(cmd);
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if let Some(reason) = &self.backend_error {
            let failure = UiEvent::dispatch_failed(cmd, reason);
            self.apply_event(failure);
            return;
        }
        let pending = cmd.clone();
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Some(failure) => self.apply_event(failure),
            None => {
                self.in_flight.insert(pending.ticket(), pending);
            }
        }
    }

    /// Fails every request still waiting on a worker that is gone.
    fn fail_in_flight(&mut self, reason: &str) {
        let pending: Vec<BackendCommand> = self.in_flight.drain().map(|(_, cmd)| cmd).collect();
        for cmd in pending {
            self.apply_event(UiEvent::dispatch_failed(cmd, reason));
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    /// Routes a response to the mounted controller. Controllers drop responses
    /// whose ticket they did not issue, so a reply for an earlier screen of
    /// the same kind is ignored too.
    fn apply_event(&mut self, event: UiEvent) {
        if let Some(ticket) = event.ticket() {
            self.in_flight.remove(&ticket);
        }
        let event = match event {
            UiEvent::BackendStopped(reason) => {
                tracing::error!(%reason, "backend worker stopped");
                self.backend_error = Some(reason.clone());
                self.fail_in_flight(&reason);
                return;
            }
            event => event,
        };
        let next = match (event, &mut self.screen) {
            (UiEvent::TasksLoaded { ticket, result }, Screen::List(screen)) => {
                screen.apply_loaded(ticket, result);
                None
            }
            (UiEvent::TaskLoaded { ticket, result }, Screen::Detail(screen)) => {
                screen.apply_loaded(ticket, result);
                None
            }
            (UiEvent::TaskLoaded { ticket, result }, Screen::Edit(screen)) => {
                screen.apply_loaded(ticket, result);
                None
            }
            (UiEvent::TaskCreated { ticket, result }, Screen::Create(screen)) => {
                screen.apply_created(ticket, result)
            }
            (UiEvent::TaskUpdated { ticket, result }, Screen::Edit(screen)) => {
                screen.apply_saved(ticket, result)
            }
            (UiEvent::TaskDeleted { ticket, result }, Screen::Detail(screen)) => {
                screen.apply_deleted(ticket, result)
            }
            (event, _) => {
                tracing::debug!(
                    event = event.name(),
                    "dropping response for a screen that is no longer mounted"
                );
                None
            }
        };
        if let Some(route) = next {
            self.navigate(route);
        }
    }

    fn perform(&mut self, intent: Intent) {
        match intent {
            Intent::Navigate(route) => self.navigate(route),
            Intent::Send(cmd) => self.dispatch(cmd),
        }
    }
}

impl eframe::App for TasksApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if let Some(reason) = &self.backend_error {
            egui::TopBottomPanel::top("backend_error").show(ctx, |ui| {
                ui.colored_label(Color32::from_rgb(220, 38, 38), reason);
            });
        }

        let intent = egui::CentralPanel::default()
            .show(ctx, |ui| match &mut self.screen {
                Screen::List(screen) => screens::list(ui, screen),
                Screen::Create(screen) => screens::create(ui, screen),
                Screen::Detail(screen) => screens::detail(ui, screen),
                Screen::Edit(screen) => screens::edit(ui, screen),
            })
            .inner;
        if let Some(intent) = intent {
            self.perform(intent);
        }

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

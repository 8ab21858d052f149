//! Per-screen rendering. Each function draws one controller and returns what
//! the user asked for; the app shell performs it after the frame is laid out.

use client_core::{
    row_label, screens::create::fields, CreateController, DetailController, DetailView,
    EditController, EditView, ListController, ListView, Route,
};
use eframe::egui::{self, Color32, RichText};
use shared::domain::{TaskStatus, DUE_DATE_FORMAT};

use crate::backend_bridge::commands::BackendCommand;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 38, 38);

#[derive(Debug)]
pub enum Intent {
    Navigate(Route),
    Send(BackendCommand),
}

fn back_button(ui: &mut egui::Ui, enabled: bool) -> bool {
    ui.add_enabled(enabled, egui::Button::new("< Back to tasks"))
        .clicked()
}

fn field_error(ui: &mut egui::Ui, message: Option<&str>) {
    if let Some(message) = message {
        ui.colored_label(ERROR_COLOR, message);
    }
    ui.add_space(6.0);
}

pub fn list(ui: &mut egui::Ui, screen: &mut ListController) -> Option<Intent> {
    let mut intent = None;
    let mut retry = false;

    ui.horizontal(|ui| {
        ui.heading("Task List");
        if ui.button("New task").clicked() {
            intent = Some(Intent::Navigate(screen.create()));
        }
    });
    ui.separator();

    match screen.view() {
        ListView::Loading => {
            ui.spinner();
        }
        ListView::Failed(message) => {
            ui.colored_label(ERROR_COLOR, message);
            retry = ui.button("Retry").clicked();
        }
        ListView::Empty => {
            ui.label("No tasks yet.");
            if ui.button("Create your first task").clicked() {
                intent = Some(Intent::Navigate(screen.create()));
            }
        }
        ListView::Populated(tasks) => {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for task in tasks {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.strong(row_label(task));
                            if ui.small_button("View").clicked() {
                                intent = Some(Intent::Navigate(screen.open(task)));
                            }
                        });
                        if !task.description.is_empty() {
                            ui.weak(&task.description);
                        }
                    });
                }
            });
        }
    }

    if retry {
        let ticket = screen.activate();
        intent = Some(Intent::Send(BackendCommand::ListTasks { ticket }));
    }
    intent
}

pub fn create(ui: &mut egui::Ui, screen: &mut CreateController) -> Option<Intent> {
    let mut intent = None;
    let submitting = screen.is_submitting();

    if back_button(ui, true) {
        intent = Some(Intent::Navigate(screen.back()));
    }
    ui.heading("Create a New Task");
    ui.separator();

    let error_for = |field| screen.field_error(field).map(str::to_owned);
    let title_error = error_for(fields::TITLE);
    let description_error = error_for(fields::DESCRIPTION);
    let status_error = error_for(fields::STATUS);
    let due_date_error = error_for(fields::DUE_DATE);

    ui.add_enabled_ui(!submitting, |ui| {
        let draft = &mut screen.draft;
        ui.label("Title");
        ui.add(egui::TextEdit::singleline(&mut draft.title).hint_text("Task title"));
        field_error(ui, title_error.as_deref());

        ui.label("Description");
        ui.add(
            egui::TextEdit::multiline(&mut draft.description)
                .hint_text("Task description")
                .desired_rows(4),
        );
        field_error(ui, description_error.as_deref());

        ui.label("Status");
        egui::ComboBox::from_id_salt("create_task_status")
            .selected_text(draft.status.label())
            .show_ui(ui, |ui| {
                for status in TaskStatus::ALL {
                    ui.selectable_value(&mut draft.status, status, status.label());
                }
            });
        field_error(ui, status_error.as_deref());

        ui.label("Due date");
        ui.add(egui::TextEdit::singleline(&mut draft.due_date).hint_text("YYYY-MM-DD"));
        field_error(ui, due_date_error.as_deref());
    });

    if let Some(message) = screen.error() {
        ui.colored_label(ERROR_COLOR, message);
    }

    let label = if submitting { "Creating..." } else { "Create Task" };
    let ready = !submitting && !screen.draft.title.trim().is_empty();
    if ui.add_enabled(ready, egui::Button::new(label)).clicked() {
        if let Some((ticket, request)) = screen.submit() {
            intent = Some(Intent::Send(BackendCommand::CreateTask { ticket, request }));
        }
    }
    intent
}

enum DetailAction {
    Retry,
    RequestDelete,
    Cancel,
    Confirm,
}

pub fn detail(ui: &mut egui::Ui, screen: &mut DetailController) -> Option<Intent> {
    let mut intent = None;
    let mut action = None;

    if back_button(ui, !screen.is_deleting()) {
        intent = Some(Intent::Navigate(screen.back()));
    }

    match screen.view() {
        DetailView::Loading => {
            ui.spinner();
        }
        DetailView::Failed(message) => {
            ui.colored_label(ERROR_COLOR, message);
            if ui.button("Retry").clicked() {
                action = Some(DetailAction::Retry);
            }
        }
        DetailView::Ready {
            task,
            error,
            confirm,
        } => {
            ui.heading(&task.title);
            ui.separator();
            if !task.description.is_empty() {
                ui.label(&task.description);
                ui.add_space(6.0);
            }
            ui.label(format!("Status: {}", task.status.label()));
            if let Some(date) = task.due_date {
                ui.label(format!("Due date: {}", date.format(DUE_DATE_FORMAT)));
            }
            if let Some(error) = error {
                ui.colored_label(ERROR_COLOR, error);
            }
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Edit").clicked() {
                    intent = Some(Intent::Navigate(screen.edit()));
                }
                let delete = egui::Button::new(RichText::new("Delete").color(ERROR_COLOR));
                if ui.add_enabled(confirm.is_none(), delete).clicked() {
                    action = Some(DetailAction::RequestDelete);
                }
            });

            if let Some(dialog) = confirm {
                let ctx = ui.ctx().clone();
                let response = egui::Modal::new(egui::Id::new("delete_task_confirm")).show(
                    &ctx,
                    |ui| {
                        ui.heading("Delete Task");
                        ui.label(dialog.prompt());
                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            if ui
                                .add_enabled(!dialog.deleting, egui::Button::new("Cancel"))
                                .clicked()
                            {
                                action = Some(DetailAction::Cancel);
                            }
                            let label = if dialog.deleting { "Deleting..." } else { "Delete" };
                            if ui
                                .add_enabled(!dialog.deleting, egui::Button::new(label))
                                .clicked()
                            {
                                action = Some(DetailAction::Confirm);
                            }
                        });
                    },
                );
                if response.should_close() && !dialog.deleting && action.is_none() {
                    action = Some(DetailAction::Cancel);
                }
            }
        }
    }

    match action {
        Some(DetailAction::Retry) => {
            let ticket = screen.activate();
            let id = screen.id().clone();
            intent = Some(Intent::Send(BackendCommand::FetchTask { ticket, id }));
        }
        Some(DetailAction::RequestDelete) => {
            screen.request_delete();
        }
        Some(DetailAction::Cancel) => {
            screen.cancel_delete();
        }
        Some(DetailAction::Confirm) => {
            if let Some(ticket) = screen.confirm_delete() {
                let id = screen.id().clone();
                intent = Some(Intent::Send(BackendCommand::DeleteTask { ticket, id }));
            }
        }
        None => {}
    }
    intent
}

pub fn edit(ui: &mut egui::Ui, screen: &mut EditController) -> Option<Intent> {
    let mut intent = None;
    let mut retry = false;
    let mut submit = false;

    if back_button(ui, true) {
        intent = Some(Intent::Navigate(screen.back()));
    }
    ui.heading("Edit Task");
    ui.separator();

    let mut editing = None;
    match screen.view() {
        EditView::Loading => {
            ui.spinner();
        }
        EditView::Failed(message) => {
            ui.colored_label(ERROR_COLOR, message);
            retry = ui.button("Retry").clicked();
        }
        EditView::Ready { saving, error, .. } => {
            if let Some(error) = error {
                ui.colored_label(ERROR_COLOR, error);
            }
            editing = Some(saving);
        }
    }

    if let Some(saving) = editing {
        let mut ready = false;
        if let Some(draft) = screen.draft_mut() {
            ui.add_enabled_ui(!saving, |ui| {
                ui.label("Title");
                ui.add(egui::TextEdit::singleline(&mut draft.title).hint_text("Task title"));
                ui.add_space(6.0);
                ui.label("Description");
                ui.add(
                    egui::TextEdit::multiline(&mut draft.description)
                        .hint_text("Task description")
                        .desired_rows(6),
                );
            });
            ready = !draft.title.trim().is_empty() && !draft.description.trim().is_empty();
        }
        ui.add_space(8.0);
        let label = if saving { "Saving..." } else { "Save changes" };
        submit = ui
            .add_enabled(ready && !saving, egui::Button::new(label))
            .clicked();
    }

    if retry {
        let ticket = screen.activate();
        let id = screen.id().clone();
        intent = Some(Intent::Send(BackendCommand::FetchTask { ticket, id }));
    }
    if submit {
        if let Some((ticket, request)) = screen.submit() {
            let id = screen.id().clone();
            intent = Some(Intent::Send(BackendCommand::UpdateTask {
                ticket,
                id,
                request,
            }));
        }
    }
    intent
}

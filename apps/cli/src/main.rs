use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, row_label, ClientConfig, CreateController, DetailController, DetailView,
    EditController, EditView, HttpTaskClient, ListController, ListView, ScreenId,
};
use shared::domain::{Task, TaskId, TaskStatus, DUE_DATE_FORMAT};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tasks", about = "List, create, show, edit and delete tasks")]
struct Cli {
    /// Base URL of the tasks API, e.g. http://127.0.0.1:8000/api
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = TaskStatus::Pending)]
        status: TaskStatus,
        /// YYYY-MM-DD; leave out for no due date
        #[arg(long, default_value = "")]
        due_date: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    let client = HttpTaskClient::new(ClientConfig::from_settings(&settings)?)?;

    match cli.command {
        Command::List => list(&client).await,
        Command::Show { id } => show(&client, TaskId::from(id)).await,
        Command::Create {
            title,
            description,
            status,
            due_date,
        } => {
            let mut screen = CreateController::new(ScreenId::next());
            screen.draft.title = title;
            screen.draft.description = description;
            screen.draft.status = status;
            screen.draft.due_date = due_date;
            create(&client, screen).await
        }
        Command::Edit {
            id,
            title,
            description,
        } => edit(&client, TaskId::from(id), title, description).await,
        Command::Delete { id, yes } => delete(&client, TaskId::from(id), yes).await,
    }
}

async fn list(client: &HttpTaskClient) -> Result<()> {
    let mut screen = ListController::new(ScreenId::next());
    screen.load(client).await;

    match screen.view() {
        ListView::Loading => bail!("task list did not finish loading"),
        ListView::Failed(message) => bail!("{message}"),
        ListView::Empty => {
            println!("No tasks yet. Create your first one with `tasks create --title <TITLE>`.")
        }
        ListView::Populated(tasks) => {
            for task in tasks {
                println!("#{:<6} {}", task.id, row_label(task));
            }
        }
    }
    Ok(())
}

fn print_task(task: &Task) {
    println!("#{} {}", task.id, task.title);
    if !task.description.is_empty() {
        println!();
        println!("{}", task.description);
        println!();
    }
    println!("Status:   {}", task.status.label());
    match task.due_date {
        Some(date) => println!("Due date: {}", date.format(DUE_DATE_FORMAT)),
        None => println!("Due date: none"),
    }
}

async fn show(client: &HttpTaskClient, id: TaskId) -> Result<()> {
    let mut screen = DetailController::new(ScreenId::next(), id);
    screen.load(client).await;

    match screen.view() {
        DetailView::Ready { task, .. } => {
            print_task(task);
            println!();
            println!("Edit with `tasks edit {}`.", task.id);
            Ok(())
        }
        DetailView::Failed(message) => bail!("{message}"),
        DetailView::Loading => bail!("task did not finish loading"),
    }
}

async fn create(client: &HttpTaskClient, mut screen: CreateController) -> Result<()> {
    if let Some(route) = screen.run_submit(client).await {
        tracing::debug!(next = %route.path(), "create finished");
        println!("Task created.");
        return Ok(());
    }

    for (field, _) in screen.field_errors().iter() {
        if let Some(message) = screen.field_error(field) {
            eprintln!("{field}: {message}");
        }
    }
    match screen.error() {
        Some(message) => bail!("{message}"),
        None => bail!("task was not created"),
    }
}

async fn edit(
    client: &HttpTaskClient,
    id: TaskId,
    title: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let mut screen = EditController::new(ScreenId::next(), id);
    screen.load(client).await;

    if let EditView::Failed(message) = screen.view() {
        bail!("{message}");
    }
    let Some(draft) = screen.draft_mut() else {
        bail!("task did not finish loading");
    };
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(description) = description {
        draft.description = description;
    }

    match screen.run_submit(client).await {
        Some(route) => {
            tracing::debug!(next = %route.path(), "update finished");
            println!("Task updated.");
            Ok(())
        }
        None => bail!("{}", screen.error().unwrap_or("task was not updated")),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().context("failed to flush prompt")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

async fn delete(client: &HttpTaskClient, id: TaskId, yes: bool) -> Result<()> {
    let mut screen = DetailController::new(ScreenId::next(), id);
    screen.load(client).await;

    if let DetailView::Failed(message) = screen.view() {
        bail!("{message}");
    }
    if !screen.request_delete() {
        bail!("task did not finish loading");
    }

    let prompt = match screen.view() {
        DetailView::Ready {
            confirm: Some(dialog),
            ..
        } => dialog.prompt(),
        _ => bail!("delete confirmation is not available"),
    };
    if !yes && !confirm(&prompt)? {
        screen.cancel_delete();
        println!("Cancelled.");
        return Ok(());
    }

    if screen.run_delete(client).await.is_some() {
        println!("Task deleted.");
        return Ok(());
    }
    match screen.view() {
        DetailView::Ready {
            error: Some(message),
            ..
        } => bail!("{message}"),
        _ => bail!("task was not deleted"),
    }
}

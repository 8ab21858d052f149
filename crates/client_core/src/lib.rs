use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Task, TaskId},
    protocol::{CreateTaskRequest, ErrorBody, UpdateTaskRequest},
};
use tracing::debug;
use url::Url;

pub mod config;
pub mod error;
pub mod screens;

pub use config::{load_settings, ClientConfig, Settings};
pub use error::ClientError;
pub use screens::{
    create::{CreateController, TaskDraft},
    detail::{ConfirmDialog, DeleteState, DetailController, DetailView},
    edit::{EditController, EditDraft, EditView},
    list::{row_label, ListController, ListView},
    RequestGuard, RequestState, Route, ScreenId, Ticket,
};

/// The `tasks` resource collection.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;
    async fn get_task(&self, id: &TaskId) -> Result<Task, ClientError>;
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<(), ClientError>;
    async fn update_task(&self, id: &TaskId, request: &UpdateTaskRequest)
        -> Result<(), ClientError>;
    async fn delete_task(&self, id: &TaskId) -> Result<(), ClientError>;
}

pub struct HttpTaskClient {
    http: Client,
    config: ClientConfig,
}

impl HttpTaskClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn tasks_url(&self) -> Url {
        self.config.endpoint(["tasks"])
    }

    /// `.` and `..` cannot be carried in a path segment, so no task has them as id.
    fn task_url(&self, id: &TaskId) -> Result<Url, ClientError> {
        if matches!(id.as_str(), "." | "..") {
            return Err(ClientError::NotFound(id.clone()));
        }
        Ok(self.config.endpoint(["tasks", id.as_str()]))
    }

    async fn execute(
        &self,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<(StatusCode, String), ClientError> {
        let transport = |source| ClientError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(url = %url, status = status.as_u16(), "task api response");
        Ok((status, body))
    }

    async fn write(&self, url: &Url, request: RequestBuilder) -> Result<(), ClientError> {
        let (status, body) = self.execute(url, request).await?;
        if !status.is_success() {
            return Err(rejection(status, body));
        }
        Ok(())
    }
}

/// Classifies a non-success response, preferring field errors when the body carries them.
fn rejection(status: StatusCode, body: String) -> ClientError {
    if let Ok(ErrorBody {
        errors: Some(errors),
        ..
    }) = serde_json::from_str::<ErrorBody>(&body)
    {
        if !errors.is_empty() {
            return ClientError::Validation(errors);
        }
    }
    ClientError::Status {
        status: status.as_u16(),
        body,
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl TaskApi for HttpTaskClient {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let url = self.tasks_url();
        let (status, body) = self.execute(&url, self.http.get(url.clone())).await?;
        if !status.is_success() {
            return Err(rejection(status, body));
        }
        decode(&body)
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task, ClientError> {
        let url = self.task_url(id)?;
        let (status, body) = self.execute(&url, self.http.get(url.clone())).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.clone()));
        }
        if !status.is_success() {
            return Err(rejection(status, body));
        }
        decode::<Option<Task>>(&body)?.ok_or_else(|| ClientError::NotFound(id.clone()))
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<(), ClientError> {
        let url = self.tasks_url();
        self.write(&url, self.http.post(url.clone()).json(request)).await
    }

    async fn update_task(
        &self,
        id: &TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<(), ClientError> {
        let url = self.task_url(id)?;
        self.write(&url, self.http.put(url.clone()).json(request)).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ClientError> {
        let url = self.task_url(id)?;
        self.write(&url, self.http.delete(url.clone())).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

use shared::{domain::TaskId, error::FieldErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("server rejected {} field(s)", .0.len())]
    Validation(FieldErrors),
    #[error("task {0} not found")]
    NotFound(TaskId),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request could not be dispatched: {0}")]
    Dispatch(String),
}

impl ClientError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Status code when the server was reached.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

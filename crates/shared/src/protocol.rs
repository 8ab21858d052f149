use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{due_date, TaskStatus},
    error::FieldErrors,
};

/// Body of `POST /tasks`. `due_date` is always present, `null` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(with = "due_date")]
    pub due_date: Option<NaiveDate>,
}

/// Body of `PUT /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: String,
}

/// Optional JSON payload of a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Option<FieldErrors>,
    #[serde(default)]
    pub message: Option<String>,
}

//! API request types for task operations.
//!
//! Request bodies are deserialized into the loose `*Request` shapes first so
//! that a missing field or an out-of-range status is reported as a validation
//! failure rather than a parse failure. `validate` turns them into the typed
//! [`TaskDraft`] and [`TaskPatch`] consumed by the repository.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::operations::validate_content;
use super::types::{Task, TaskStatus};

/// Request payload for creating a task.
///
/// Unknown fields (including `id`) are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl CreateTaskRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// Checks required fields and builds a draft.
    pub fn validate(self) -> Result<TaskDraft, ValidationError> {
        let content = self
            .content
            .ok_or(ValidationError::MissingField("content"))?;
        validate_content(&content)?;
        Ok(TaskDraft { content })
    }
}

/// Request payload for replacing the mutable fields of a task.
///
/// Unknown fields (including `id`) are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<u64>,
}

impl UpdateTaskRequest {
    pub fn new(content: impl Into<String>, status: TaskStatus, completed_on: u64) -> Self {
        Self {
            content: Some(content.into()),
            status: Some(status.as_str().to_string()),
            completed_on: Some(completed_on),
        }
    }

    /// Checks required fields and the status enum, and builds a patch.
    pub fn validate(self) -> Result<TaskPatch, ValidationError> {
        let content = self
            .content
            .ok_or(ValidationError::MissingField("content"))?;
        let status = self.status.ok_or(ValidationError::MissingField("status"))?;
        let completed_on = self
            .completed_on
            .ok_or(ValidationError::MissingField("completedOn"))?;

        validate_content(&content)?;
        let status = status.parse::<TaskStatus>()?;

        Ok(TaskPatch {
            content,
            status,
            completed_on,
        })
    }
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub content: String,
}

impl TaskDraft {
    /// Builds the task to store under `id`, with system-assigned defaults.
    pub fn into_task(self, id: impl Into<String>) -> Task {
        Task {
            id: id.into(),
            content: self.content,
            status: TaskStatus::Pending,
            completed_on: 0,
        }
    }
}

/// Validated full replacement of a task's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    pub content: String,
    pub status: TaskStatus,
    pub completed_on: u64,
}

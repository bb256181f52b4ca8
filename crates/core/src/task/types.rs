use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Lifecycle state of a task.
///
/// Serialized as `PENDING` / `COMPLETED`. Any value may follow any other on
/// update; transitions are not enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    /// Returns the wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TaskStatus::Pending),
            "COMPLETED" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// A stored task.
///
/// `id` is minted by the storage layer when the task is created and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub content: String,
    pub status: TaskStatus,
    /// Completion timestamp. Epoch semantics are up to the caller; `0` means unset.
    pub completed_on: u64,
}

impl Task {
    /// Returns true if the task is marked as completed.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

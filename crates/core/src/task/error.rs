use thiserror::Error;

/// Errors produced when a draft or patch does not conform to the task schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Task content cannot be empty")]
    EmptyContent,
    #[error("Task content too long (max {max} bytes)")]
    ContentTooLong { max: usize },
    #[error("Invalid status: {0} (expected PENDING or COMPLETED)")]
    InvalidStatus(String),
}

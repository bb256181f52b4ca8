use thiserror::Error;

use crate::storage::{repository_error_to_status_code, RepositoryError};
use crate::task::ValidationError;

/// Outcome of a request that did not produce a payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The body is not JSON of the expected shape.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    /// The body parsed but violates the task schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The route requires a task id and none was supplied.
    #[error("Missing task id")]
    MissingId,
    /// No task exists under the requested id.
    #[error("Task not found: {0}")]
    NotFound(String),
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// The response payload could not be serialized.
    #[error("Response serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// True for errors caused by the server rather than the request.
    pub fn is_server_error(&self) -> bool {
        api_error_to_status_code(self) >= 500
    }
}

/// Maps an [`ApiError`] to an HTTP status code.
///
/// - `MalformedBody` -> 422 (Unprocessable Entity)
/// - `Validation` -> 400 (Bad Request)
/// - `MissingId` -> 400 (Bad Request)
/// - `NotFound` -> 404 (Not Found)
/// - `MethodNotAllowed` -> 405 (Method Not Allowed)
/// - `Repository` -> see [`repository_error_to_status_code`]
/// - `Serialization` -> 500 (Internal Server Error)
pub fn api_error_to_status_code(error: &ApiError) -> u16 {
    match error {
        ApiError::MalformedBody(_) => 422,
        ApiError::Validation(_) => 400,
        ApiError::MissingId => 400,
        ApiError::NotFound(_) => 404,
        ApiError::MethodNotAllowed(_) => 405,
        ApiError::Repository(err) => repository_error_to_status_code(err),
        ApiError::Serialization(_) => 500,
    }
}

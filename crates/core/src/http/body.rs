//! Request body decoding.
//!
//! Parse failures, invalid UTF-8 included, map to [`ApiError::MalformedBody`]
//! (422); schema violations map to [`ApiError::Validation`] (400).

use serde::de::DeserializeOwned;

use crate::task::{CreateTaskRequest, TaskDraft, TaskPatch, UpdateTaskRequest};

use super::ApiError;

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// Decodes and validates a create body.
pub fn decode_draft(body: &[u8]) -> Result<TaskDraft, ApiError> {
    let request: CreateTaskRequest = decode(body)?;
    Ok(request.validate()?)
}

/// Decodes and validates an update body.
pub fn decode_patch(body: &[u8]) -> Result<TaskPatch, ApiError> {
    let request: UpdateTaskRequest = decode(body)?;
    Ok(request.validate()?)
}

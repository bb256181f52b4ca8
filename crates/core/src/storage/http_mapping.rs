//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// Both variants are server-side faults and map to 500. Missing records are
/// not errors and never reach this function.
///
/// # Examples
///
/// ```
/// use taskdeck_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::Store("DynamoDB internal server error".to_string());
/// assert_eq!(repository_error_to_status_code(&error), 500);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::Encoding(_) => 500,
        RepositoryError::Store(_) => 500,
    }
}

use thiserror::Error;

/// Errors that can occur during repository operations.
///
/// "Record absent" is never an error: operations that can miss return
/// `Ok(None)` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A value could not be marshaled to, or unmarshaled from, the store's
    /// attribute representation.
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// The backing store rejected the request or could not be reached.
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

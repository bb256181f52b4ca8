use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("{0} secret is empty")]
    Empty(String),

    #[error("secret backend error: {0}")]
    Backend(String),
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, XtaskError>;

#[derive(Debug, Error)]
pub enum XtaskError {
    #[error("DynamoDB request failed: {0}")]
    Aws(String),

    #[error("table '{0}' does not exist, run `cargo xtask up` first")]
    MissingTable(String),

    #[error("table '{table}' cannot hold tasks: {reason}")]
    WrongKeySchema { table: String, reason: String },

    #[error("table '{0}' did not become ACTIVE in time")]
    NotActive(String),

    #[error("{remaining} tasks were still unprocessed after {attempts} batch writes")]
    Unprocessed { remaining: usize, attempts: u32 },

    #[error("aborted")]
    Aborted,

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Flattens any SDK error into its display chain.
pub fn aws(err: impl std::error::Error) -> XtaskError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    XtaskError::Aws(message)
}

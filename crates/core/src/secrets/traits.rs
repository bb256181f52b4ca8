use async_trait::async_trait;

use super::SecretError;

/// Result type for secret lookups.
pub type Result<T> = std::result::Result<T, SecretError>;

/// Named secret retrieval.
#[async_trait]
pub trait SecretLookup: Send + Sync {
    /// Fetch the string value of the secret called `name`.
    ///
    /// Fails if the secret does not exist or its value is empty.
    async fn get_secret(&self, name: &str) -> Result<String>;
}

//! Environment-backed secret lookup for local runs.

use async_trait::async_trait;

use taskdeck_core::secrets::{require_secret_value, Result, SecretError, SecretLookup};

/// Reads each secret from an environment variable derived from its name.
///
/// `prod/api-key` is read from `PROD_API_KEY`: ASCII letters are upper-cased
/// and every other non-alphanumeric character becomes `_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretLookup;

impl EnvSecretLookup {
    /// Environment variable consulted for `name`.
    pub fn variable_name(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[async_trait]
impl SecretLookup for EnvSecretLookup {
    async fn get_secret(&self, name: &str) -> Result<String> {
        let variable = Self::variable_name(name);
        match std::env::var(&variable) {
            Ok(value) => require_secret_value(name, Some(value)),
            Err(std::env::VarError::NotPresent) => Err(SecretError::NotFound(name.to_string())),
            Err(err) => Err(SecretError::Backend(format!("{}: {}", variable, err))),
        }
    }
}

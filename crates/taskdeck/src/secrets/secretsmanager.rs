//! AWS Secrets Manager lookup.

use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_secretsmanager::error::SdkError;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use aws_sdk_secretsmanager::Client;

use taskdeck_core::secrets::{require_secret_value, Result, SecretError, SecretLookup};

/// Reads secret strings with `GetSecretValue`.
#[derive(Debug, Clone)]
pub struct SecretsManagerLookup {
    client: Client,
}

impl SecretsManagerLookup {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a lookup from a loaded AWS configuration.
    pub fn from_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl SecretLookup for SecretsManagerLookup {
    async fn get_secret(&self, name: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|e| map_get_secret_value_error(e, name))?;

        require_secret_value(name, output.secret_string)
    }
}

fn map_get_secret_value_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetSecretValueError, R>,
    name: &str,
) -> SecretError {
    classify_service_error(err.into_service_error(), name)
}

fn classify_service_error(err: GetSecretValueError, name: &str) -> SecretError {
    match err {
        GetSecretValueError::ResourceNotFoundException(_) => SecretError::NotFound(name.to_string()),
        err => SecretError::Backend(format!("GetSecretValue failed: {:?}", err)),
    }
}

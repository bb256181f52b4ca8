use std::{env, fmt, str::FromStr, time::Duration};

use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Which table implementation backs the task repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageBackend {
    #[default]
    Dynamodb,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(StorageBackend::Dynamodb),
            "memory" | "inmemory" => Ok(StorageBackend::Memory),
            _ => Err("expected dynamodb or memory".to_string()),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Dynamodb => write!(f, "dynamodb"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Where the API key secret is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecretsBackend {
    #[default]
    SecretsManager,
    Env,
}

impl FromStr for SecretsBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "secretsmanager" => Ok(SecretsBackend::SecretsManager),
            "env" => Ok(SecretsBackend::Env),
            _ => Err("expected secretsmanager or env".to_string()),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// The AWS region and endpoint (`AWS_REGION`, `AWS_ENDPOINT_URL`) are read by
/// the AWS SDK's own configuration loader and are not duplicated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// DynamoDB table holding tasks (default: "tasks")
    pub table_name: String,
    /// Path segment the API is served under, without slashes (default: "tasks")
    pub api_path: String,
    /// Value of `Access-Control-Allow-Origin` (default: "*")
    pub origin_url: String,
    /// Secret holding the API key; validation is disabled when unset
    pub api_key_secret_name: Option<String>,
    /// Scan `Limit` per DynamoDB request; unset lets DynamoDB decide
    pub scan_page_size: Option<i32>,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,
    pub storage_backend: StorageBackend,
    pub secrets_backend: SecretsBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: "tasks".to_string(),
            api_path: "tasks".to_string(),
            origin_url: "*".to_string(),
            api_key_secret_name: None,
            scan_page_size: None,
            request_timeout_secs: 10,
            storage_backend: StorageBackend::default(),
            secrets_backend: SecretsBackend::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TABLE_NAME` - DynamoDB table name (default: "tasks")
    /// - `API_PATH` - API path segment (default: "tasks")
    /// - `ORIGIN_URL` - allowed CORS origin (default: "*")
    /// - `API_KEY_SECRET_NAME` - secret holding the API key (optional)
    /// - `SCAN_PAGE_SIZE` - scan page size, at least 1 (optional)
    /// - `REQUEST_TIMEOUT_SECS` - request timeout (default: 10)
    /// - `STORAGE_BACKEND` - `dynamodb` or `memory` (default: dynamodb)
    /// - `SECRETS_BACKEND` - `secretsmanager` or `env` (default: secretsmanager)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let api_path = match var("API_PATH") {
            Some(value) => {
                let trimmed = value.trim_matches('/').to_string();
                if trimmed.is_empty() || trimmed.contains('/') {
                    return Err(invalid(
                        "API_PATH",
                        value,
                        "must be a single path segment",
                    ));
                }
                trimmed
            }
            None => defaults.api_path,
        };

        let scan_page_size = match var("SCAN_PAGE_SIZE") {
            Some(value) => match value.parse::<i32>() {
                Ok(size) if size >= 1 => Some(size),
                Ok(_) => return Err(invalid("SCAN_PAGE_SIZE", value, "must be at least 1")),
                Err(e) => return Err(invalid("SCAN_PAGE_SIZE", value, e)),
            },
            None => None,
        };

        let request_timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map_err(|e| invalid("REQUEST_TIMEOUT_SECS", value.clone(), e))?,
            None => defaults.request_timeout_secs,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(value) => value
                .parse()
                .map_err(|e: String| invalid("STORAGE_BACKEND", value.clone(), e))?,
            None => defaults.storage_backend,
        };

        let secrets_backend = match var("SECRETS_BACKEND") {
            Some(value) => value
                .parse()
                .map_err(|e: String| invalid("SECRETS_BACKEND", value.clone(), e))?,
            None => defaults.secrets_backend,
        };

        Ok(Self {
            table_name: var("TABLE_NAME").unwrap_or(defaults.table_name),
            api_path,
            origin_url: var("ORIGIN_URL").unwrap_or(defaults.origin_url),
            api_key_secret_name: var("API_KEY_SECRET_NAME"),
            scan_page_size,
            request_timeout_secs,
            storage_backend,
            secrets_backend,
        })
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn invalid(name: &'static str, value: String, reason: impl fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value,
        reason: reason.to_string(),
    }
}

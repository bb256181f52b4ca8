//! Application state shared by all request handlers.
//!
//! Storage and secret clients are created once at startup and injected here as
//! trait objects; handlers only ever see `Arc<dyn TaskRepository>` and
//! `Arc<dyn SecretLookup>`.

use std::{sync::Arc, time::Duration};

use taskdeck_core::http::CorsPolicy;
use taskdeck_core::secrets::SecretLookup;
use taskdeck_core::storage::TaskRepository;

use crate::config::Config;
use crate::handlers::api_key::API_KEY_HEADER_NAME;

#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskRepository>,
    pub secrets: Arc<dyn SecretLookup>,
    /// CORS headers attached to every response.
    pub cors: CorsPolicy,
    /// Path segment the API is mounted under, without slashes.
    pub api_path: String,
    /// Secret holding the API key. `None` disables key validation.
    pub api_key_secret: Option<String>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        secrets: Arc<dyn SecretLookup>,
        config: &Config,
    ) -> Self {
        let mut cors = CorsPolicy::new(config.origin_url.clone());
        if config.api_key_secret_name.is_some() {
            cors = cors.allow_header(API_KEY_HEADER_NAME);
        }

        Self {
            tasks,
            secrets,
            cors,
            api_path: config.api_path.clone(),
            api_key_secret: config.api_key_secret_name.clone(),
            request_timeout: config.request_timeout(),
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    /// In-memory storage, environment secrets and default configuration.
    fn default() -> Self {
        use crate::secrets::EnvSecretLookup;
        use crate::storage::{InMemoryTable, TableTaskRepository};

        Self::new(
            Arc::new(TableTaskRepository::new(InMemoryTable::default())),
            Arc::new(EnvSecretLookup),
            &Config::default(),
        )
    }
}

mod app;
mod config;
mod handlers;
mod secrets;
mod state;
mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskdeck_core::secrets::SecretLookup;
use taskdeck_core::storage::TaskRepository;

use crate::{
    app::create_app,
    config::{Config, SecretsBackend, StorageBackend},
    secrets::{EnvSecretLookup, SecretsManagerLookup},
    state::AppState,
    storage::{DynamoDbTable, InMemoryTable, TableTaskRepository},
};

/// Taskdeck - Task CRUD API backed by DynamoDB
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,

    /// Storage backend, overrides STORAGE_BACKEND
    #[arg(long, value_enum)]
    storage: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(storage) = cli.storage {
        config.storage_backend = storage;
    }

    tracing::info!(
        storage = %config.storage_backend,
        table = %config.table_name,
        api_path = %config.api_path,
        api_key = config.api_key_secret_name.is_some(),
        "Starting taskdeck"
    );

    let state = build_state(&config).await;
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Human-readable logs by default, JSON lines when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskdeck=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Creates the storage and secret clients once and wires them into the state.
async fn build_state(config: &Config) -> AppState {
    let needs_aws = config.storage_backend == StorageBackend::Dynamodb
        || (config.api_key_secret_name.is_some()
            && config.secrets_backend == SecretsBackend::SecretsManager);
    let aws_config = if needs_aws {
        Some(aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await)
    } else {
        None
    };

    let tasks: Arc<dyn TaskRepository> = match (config.storage_backend, &aws_config) {
        (StorageBackend::Dynamodb, Some(aws_config)) => {
            let table = DynamoDbTable::from_config(aws_config, config.table_name.clone())
                .with_page_size(config.scan_page_size);
            Arc::new(TableTaskRepository::new(table))
        }
        _ => {
            tracing::warn!("Using in-memory storage, tasks are lost on restart");
            let mut table = InMemoryTable::default();
            if let Some(page_size) = config.scan_page_size {
                table = table.with_page_size(page_size.unsigned_abs() as usize);
            }
            Arc::new(TableTaskRepository::new(table))
        }
    };

    let secrets: Arc<dyn SecretLookup> = match (config.secrets_backend, &aws_config) {
        (SecretsBackend::SecretsManager, Some(aws_config)) => {
            Arc::new(SecretsManagerLookup::from_config(aws_config))
        }
        _ => Arc::new(EnvSecretLookup),
    };

    AppState::new(tasks, secrets, config)
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}

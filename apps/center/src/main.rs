//! AllyHub Center process host
//!
//! Loads configuration, opens the database, wires the core services and
//! keeps expired sessions swept until shutdown. Request routing lives in the
//! HTTP layer, which is handed the built [`CoreServices`].

mod config;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use allyhub_core::{CoreServices, CoreServicesBuilder, PoolTypeRegistry};
use allyhub_storage::{
    Database, SqliteApiTokenRepository, SqliteEndpointPoolRepository, SqliteSessionRepository,
    SqliteUserRepository,
};
use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let _log_guard = logging::init_tracing(&config.log_dir)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.database_path.display(),
        logs = %config.log_dir.display(),
        "Starting AllyHub Center"
    );

    let services = Arc::new(build_services(&config)?);
    info!(
        pool_types = ?services.pools.pool_types(),
        config_loaded = services.registry.is_loaded(),
        "Core services ready"
    );

    let sweeper = config
        .session_sweep_interval
        .map(|interval| spawn_session_sweep(services.clone(), interval));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");

    if let Some(handle) = sweeper {
        handle.abort();
    }
    Ok(())
}

/// Open storage and wire every core service
fn build_services(config: &AppConfig) -> Result<CoreServices> {
    let registry = Arc::new(PoolTypeRegistry::load_or_fallback(
        config.pool_config_path.as_deref(),
    ));

    let db = Database::open(&config.database_path)?;
    let db = Arc::new(Mutex::new(db));

    CoreServicesBuilder::new()
        .with_registry(registry)
        .with_user_repo(Arc::new(SqliteUserRepository::new(db.clone())))
        .with_session_repo(Arc::new(SqliteSessionRepository::new(db.clone())))
        .with_pool_repo(Arc::new(SqliteEndpointPoolRepository::new(db.clone())))
        .with_token_repo(Arc::new(SqliteApiTokenRepository::new(db)))
        .build()
}

/// Delete expired sessions every `interval`
fn spawn_session_sweep(services: Arc<CoreServices>, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Session sweep enabled");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = services
                .accounts
                .sweep_expired_sessions(chrono::Utc::now())
                .await
            {
                error!(error = %e, "Session sweep failed");
            }
        }
    })
}

//! Process configuration from the environment

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default housekeeping interval for expired sessions.
pub const DEFAULT_SESSION_SWEEP_SECS: u64 = 3600;

/// Host settings resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    /// `None` means the registry's default location
    pub pool_config_path: Option<PathBuf>,
    pub log_dir: PathBuf,
    /// `None` disables the sweep
    pub session_sweep_interval: Option<Duration>,
}

impl AppConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_path = match get("ALLYHUB_DB_PATH").or_else(|| get("DB_PATH")) {
            Some(path) => PathBuf::from(path),
            None => allyhub_storage::default_database_path()
                .unwrap_or_else(|| PathBuf::from(allyhub_storage::DATABASE_FILE)),
        };

        let log_dir = match get("ALLYHUB_LOG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_log_dir(),
        };

        let sweep_secs = match get("ALLYHUB_SESSION_SWEEP_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("ALLYHUB_SESSION_SWEEP_SECS is not a number: {raw:?}"))?,
            None => DEFAULT_SESSION_SWEEP_SECS,
        };

        Ok(Self {
            database_path,
            pool_config_path: get("ALLYHUB_POOL_CONFIG").map(PathBuf::from),
            log_dir,
            session_sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
        })
    }
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("allyhub"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs")
}

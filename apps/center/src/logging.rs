//! Tracing setup: compact console output plus a daily-rotated log file

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file prefix, e.g. `allyhub-center.2026-01-22.log`
const LOG_PREFIX: &str = "allyhub-center";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live for the
/// whole process.
pub fn init_tracing(logs_dir: &Path) -> Result<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        eprintln!("Warning: Failed to create logs directory: {}", e);
    }

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(logs_dir)
        .context("Failed to create log file appender")?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG takes precedence
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info")
            .add_directive("allyhub_core=debug".parse()?)
            .add_directive("allyhub_storage=debug".parse()?)
            .add_directive("allyhub_center=debug".parse()?),
    };

    let console_layer = fmt::layer()
        .with_ansi(true)
        .compact()
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Events go to the log file only, since
/// the terminal belongs to the calendar.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log level {:?}", config.log_level))?;

    let Some(log_path) = config.effective_log_path() else {
        tracing_subscriber::registry()
            .with(filter)
            .try_init()
            .context("installing log subscriber")?;
        return Ok(());
    };

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {:?}", log_path))?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("installing log subscriber")?;

    info!(path = %log_path.display(), "logging initialized");
    Ok(())
}

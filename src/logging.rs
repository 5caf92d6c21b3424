//! Tracing setup. The TUI owns the terminal, so interactive sessions log to a
//! rolling file; one-shot commands log to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_PREFIX: &str = "chatline.log";

/// Where TUI logs go: the platform data dir, or `fallback` when there is none.
pub fn log_dir(fallback: &Path) -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("chatline").join("logs"))
        .unwrap_or_else(|| fallback.join("logs"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// File-only JSON logging. Keep the guard alive until exit so buffered lines
/// are flushed.
pub fn init_tui(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());

    // No terminal layer
    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Compact stderr logging for commands that do not take over the terminal.
pub fn init_cli() -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_ends_in_logs() {
        let dir = log_dir(Path::new("/tmp/chatline-home"));
        assert!(dir.ends_with("logs"));
    }
}

//! Structured logging setup: every event goes to stderr and to the run's log
//! file, both with timestamps, replacing the original tool's hand-rolled
//! `log()` prints with a conventional `tracing` subscriber.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Initialize the global subscriber. Must be called once, before any stage
/// emits an event. `RUST_LOG` overrides the default `info` filter.
pub fn init(log_path: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create log directory {}", parent.display()))?;
        }
    }
    let log_file = std::fs::File::create(log_path)
        .with_context(|| format!("create log file {}", log_path.display()))?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

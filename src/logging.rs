//! Tracing setup. The TUI owns stdout, so logs go to a file.

use anyhow::{Context as _, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("could not create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("could not install tracing subscriber: {e}"))?;

    Ok(())
}

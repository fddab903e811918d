//! Command implementations behind the `medprune` binary

pub mod prune;
mod report;
pub mod stats;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{Config, Schema};

/// Resolve and validate the configuration for a run over `root`
fn load_config(explicit: Option<&Path>, root: &Path) -> Result<(Config, Schema, Option<PathBuf>)> {
    let (config, origin) =
        Config::resolve(explicit, root).context("Failed to load configuration")?;
    let schema = config.schema().with_context(|| match &origin {
        Some(path) => format!("Invalid configuration in {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    match &origin {
        Some(path) => info!(config = %path.display(), "Loaded configuration"),
        None => info!("Using default configuration"),
    }

    Ok((config, schema, origin))
}

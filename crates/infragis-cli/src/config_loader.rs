//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use infragis_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "infragis.toml";

/// Load layered configuration: defaults, then the file, then the
/// environment, then command-line overrides
///
/// An explicit `--config` path must exist; the default file is optional.
pub fn load_config(explicit: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file(explicit) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

fn config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

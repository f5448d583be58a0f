//! CLI command implementations.

pub mod ask;
pub mod chat;
pub mod classifier;
pub mod config;
pub mod init;
pub mod predict;

use anyhow::{Context, Result};
use ricewise_config::{AppPaths, Config};
use std::path::Path;

/// Get the application paths, honoring `--config` when given.
pub fn get_paths(config_override: Option<&Path>) -> Result<AppPaths> {
    match config_override {
        Some(path) => Ok(AppPaths::for_file(path.to_path_buf())),
        None => AppPaths::new().context("Failed to determine application directories"),
    }
}

/// Load and validate the configuration.
pub fn load_config(paths: &AppPaths) -> Result<Config> {
    let config = Config::load_from(&paths.config_file).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            paths.config_file.display()
        )
    })?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Format a byte count in human-readable form.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

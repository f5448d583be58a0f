//! Application paths management.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable that points at an explicit config file.
pub const CONFIG_PATH_VAR: &str = "RICEWISE_CONFIG";

/// Manages application paths following platform conventions.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl AppPaths {
    /// Create paths using platform-specific directories.
    ///
    /// `RICEWISE_CONFIG` replaces the config file location when set.
    pub fn new() -> Option<Self> {
        if let Some(file) = std::env::var_os(CONFIG_PATH_VAR).filter(|v| !v.is_empty()) {
            return Some(Self::for_file(PathBuf::from(file)));
        }

        let proj_dirs = ProjectDirs::from("com", "ricewise", "ricewise")?;
        let config_dir = proj_dirs.config_dir().to_path_buf();

        Some(Self {
            config_file: config_dir.join("config.toml"),
            config_dir,
        })
    }

    /// Paths rooted at an explicit config file.
    pub fn for_file(config_file: PathBuf) -> Self {
        let config_dir = config_file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        Self {
            config_dir,
            config_file,
        }
    }

    /// Create the config directory.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        if !self.config_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }
}

/// Expand a leading `~` and environment variables in a configured path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(raw),
    }
}

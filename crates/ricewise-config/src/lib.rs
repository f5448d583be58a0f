//! Ricewise Config - Configuration management for the Ricewise services.

mod config;
mod credentials;
mod error;
mod paths;

pub use config::*;
pub use credentials::{Credentials, GROQ_API_KEY_VAR, HF_TOKEN_VAR};
pub use error::{ConfigError, ConfigResult};
pub use paths::{expand_path, AppPaths, CONFIG_PATH_VAR};

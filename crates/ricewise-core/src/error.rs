//! Error types for Ricewise.

use thiserror::Error;

/// Core error type for Ricewise operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias using Ricewise's Error.
pub type Result<T> = std::result::Result<T, Error>;

//! Ricewise Core - Shared domain types for the rice advisory services.

mod error;
mod types;

pub use error::{Error, Result};
pub use types::*;

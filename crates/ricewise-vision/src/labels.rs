//! Class names, in model output order.

use crate::error::{VisionError, VisionResult};
use std::path::Path;
use tracing::debug;

/// Ordered class names; position `i` labels model output `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    /// Wrap a non-empty list of names.
    pub fn new(names: Vec<String>) -> Option<Self> {
        if names.is_empty() {
            None
        } else {
            Some(Self(names))
        }
    }

    /// Load a JSON array of strings, e.g. `["brown_spot", "healthy"]`.
    pub fn load(path: &Path) -> VisionResult<Self> {
        let invalid = |message: String| VisionError::ClassNames {
            path: path.to_path_buf(),
            message,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let names: Vec<String> =
            serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?;
        let names = Self::new(names).ok_or_else(|| invalid("no class names listed".to_string()))?;

        debug!("Loaded {} class names from {}", names.len(), path.display());
        Ok(names)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

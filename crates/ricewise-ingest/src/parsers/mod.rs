//! Document parsers.

mod pdf;

pub use pdf::PdfParser;

use crate::error::IngestResult;
use std::path::Path;

/// Parsed document content, one entry per page.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Text of each page, in page order.
    pub pages: Vec<String>,
}

impl ParsedDocument {
    /// Create a new parsed document.
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Whether any page has non-whitespace text.
    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|p| !p.trim().is_empty())
    }
}

/// Trait for document parsers.
pub trait DocumentParser: Send + Sync {
    /// Parse a file at the given path.
    fn parse(&self, path: &Path) -> IngestResult<ParsedDocument>;

    /// Get the supported file extensions.
    fn extensions(&self) -> &[&str];

    /// Check if this parser supports the given extension.
    fn supports(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

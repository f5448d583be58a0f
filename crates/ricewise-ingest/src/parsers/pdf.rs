//! PDF document parser.

use super::{DocumentParser, ParsedDocument};
use crate::error::{IngestError, IngestResult};
use std::path::Path;
use tracing::debug;

/// Parser for PDF files.
pub struct PdfParser;

impl PdfParser {
    /// Create a new PDF parser.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for PdfParser {
    fn parse(&self, path: &Path) -> IngestResult<ParsedDocument> {
        if !path.exists() {
            return Err(IngestError::FileNotFound(path.to_path_buf()));
        }

        debug!("Parsing PDF: {:?}", path);

        // The extractor panics on some malformed fonts; treat that as a parse failure.
        let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_by_pages(path));
        let raw_pages = match extracted {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                return Err(IngestError::ParseError {
                    path: path.to_path_buf(),
                    message: format!("Failed to extract text from PDF: {}", e),
                })
            }
            Err(_) => {
                return Err(IngestError::ParseError {
                    path: path.to_path_buf(),
                    message: "PDF text extractor panicked".to_string(),
                })
            }
        };

        let pages: Vec<String> = raw_pages.iter().map(|p| clean_pdf_text(p)).collect();
        debug!(
            "Extracted {} characters over {} pages from {:?}",
            pages.iter().map(String::len).sum::<usize>(),
            pages.len(),
            path
        );

        Ok(ParsedDocument::new(pages))
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

/// Clean up extracted PDF text.
fn clean_pdf_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        // Collapse runs of empty lines into one
        .fold(Vec::new(), |mut acc: Vec<&str>, line| {
            let last_was_empty = acc.last().map(|s| s.is_empty()).unwrap_or(false);
            if !(line.is_empty() && last_was_empty) {
                acc.push(line);
            }
            acc
        })
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::pdf_with_pages;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_clean_pdf_text() {
        let messy = "  Hello  \n\n\n\nWorld  \n\nTest";
        let cleaned = clean_pdf_text(messy);
        assert_eq!(cleaned, "Hello\n\nWorld\n\nTest");
    }

    #[test]
    fn test_parse_keeps_pages_apart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blast.pdf");
        fs::write(
            &path,
            pdf_with_pages(&["Leaf blast lesions", "Sheath blight control"]),
        )
        .unwrap();

        let doc = PdfParser::new().parse(&path).unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert!(doc.pages[0].contains("blast"));
        assert!(!doc.pages[0].contains("Sheath"));
        assert!(doc.pages[1].contains("Sheath blight"));
        assert!(doc.has_text());
    }

    #[test]
    fn test_blank_page_is_kept_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gap.pdf");
        fs::write(&path, pdf_with_pages(&["First", "", "Third"])).unwrap();

        let doc = PdfParser::new().parse(&path).unwrap();
        assert_eq!(doc.pages.len(), 3);
        assert!(doc.pages[1].is_empty());
        assert!(doc.pages[2].contains("Third"));
    }

    #[test]
    fn test_pdf_parser_extensions() {
        let parser = PdfParser::new();
        assert!(parser.supports("pdf"));
        assert!(parser.supports("PDF"));
        assert!(!parser.supports("txt"));
    }

    #[test]
    fn test_missing_file() {
        let parser = PdfParser::new();
        let err = parser.parse(Path::new("/nonexistent/paper.pdf")).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
    }
}

//! Ricewise Ingest - Research paper loading for retrieval.
//!
//! This crate provides:
//! - Discovery of PDF files under the configured folder
//! - Page-aware PDF text extraction
//! - Recursive character chunking with overlap

mod chunker;
mod error;
#[cfg(test)]
mod fixtures;
mod loader;
mod parsers;

pub use chunker::{ChunkConfig, Chunker};
pub use error::{IngestError, IngestResult};
pub use loader::{discover_pdfs, DocumentLoader};
pub use parsers::{DocumentParser, ParsedDocument, PdfParser};

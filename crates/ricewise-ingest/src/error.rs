//! Error types for the ingestion pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Research papers folder '{0}' not found")]
    FolderNotFound(PathBuf),

    #[error("No PDF files found in '{0}'")]
    NoDocuments(PathBuf),

    #[error("No text could be extracted from the PDF files in '{0}'")]
    NoText(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Parse error for {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

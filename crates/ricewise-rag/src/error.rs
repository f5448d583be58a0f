//! Error types for embedding, retrieval and generation.

use thiserror::Error;

/// Errors that can occur while answering a question.
#[derive(Error, Debug)]
pub enum RagError {
    /// Unable to reach a hosted service.
    #[error("Connection error: could not reach {host}")]
    Connection { host: String },

    /// Request timeout.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The service rejected the credentials.
    #[error("{service} rejected the API credentials (status {status})")]
    Unauthorized { service: &'static str, status: u16 },

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Response parsed but did not contain what we asked for.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Embedding dimension mismatch.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Index construction was given nothing to index.
    #[error("Cannot build an index from zero chunks")]
    EmptyIndex,

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for RAG operations.
pub type RagResult<T> = Result<T, RagError>;

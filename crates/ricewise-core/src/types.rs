//! Core domain types for Ricewise.

use crate::error::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current time as epoch seconds.
pub fn epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Where a chunk came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Path of the source PDF.
    pub source: String,
    /// Zero-based page number within the source.
    pub page: u32,
    /// Position of the chunk within its page.
    pub chunk_index: u32,
}

/// A chunk of research paper text, as stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// Default context tag sent by the web client.
pub const DEFAULT_CONTEXT_TAG: &str = "rice_agriculture";

fn default_context_tag() -> Option<String> {
    Some(DEFAULT_CONTEXT_TAG.to_string())
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Free-form tag from the client; carried but not used for retrieval.
    #[serde(rename = "context", default = "default_context_tag")]
    pub context_tag: Option<String>,
    /// Client cache-busting noise.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context_tag: default_context_tag(),
            timestamp: None,
        }
    }

    /// Return the trimmed question, rejecting empty or oversized input.
    pub fn question(&self, max_chars: usize) -> Result<&str> {
        let question = self.message.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput("message must not be empty".to_string()));
        }
        let len = question.chars().count();
        if len > max_chars {
            return Err(Error::InvalidInput(format!(
                "message is {} characters long, the limit is {}",
                len, max_chars
            )));
        }
        Ok(question)
    }
}

/// A source chunk as shown to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSnippet {
    pub title: String,
    #[serde(rename = "content")]
    pub snippet: String,
    pub metadata: ChunkMetadata,
}

impl SourceSnippet {
    /// Build the snippet for the chunk at `rank` (zero-based) in retrieval order.
    pub fn from_chunk(rank: usize, chunk: &DocumentChunk, max_chars: usize) -> Self {
        Self {
            title: format!("Research Paper {}", rank + 1),
            snippet: truncate_with_ellipsis(&chunk.text, max_chars),
            metadata: chunk.metadata.clone(),
        }
    }
}

/// Keep the first `max_chars` characters and append an ellipsis marker.
///
/// The marker is always appended, matching what the web client has always
/// received, so a snippet is at most `max_chars + 3` characters.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Body returned by `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(rename = "response")]
    pub answer: String,
    pub confidence: f32,
    pub sources: Vec<SourceSnippet>,
    pub suggestions: Vec<String>,
    #[serde(rename = "processing_time")]
    pub processing_time_seconds: f64,
}

/// Round seconds to two decimal places.
pub fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// Readiness of the chat service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Initializing,
}

/// Body returned by `GET /health` on the chat service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub message: String,
    pub models_loaded: bool,
    pub timestamp: i64,
}

impl HealthResponse {
    pub fn new(ready: bool) -> Self {
        Self {
            status: if ready {
                HealthStatus::Healthy
            } else {
                HealthStatus::Initializing
            },
            message: "Rice AI RAG Backend".to_string(),
            models_loaded: ready,
            timestamp: epoch_seconds(),
        }
    }
}

/// Body returned by `GET /test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsResponse {
    pub message: String,
    pub llm_loaded: bool,
    pub vector_db_loaded: bool,
    pub timestamp: i64,
}

/// Body returned by `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResponse {
    #[serde(rename = "result")]
    pub predicted_label: String,
    #[serde(rename = "probs")]
    pub class_probabilities: Vec<f32>,
}

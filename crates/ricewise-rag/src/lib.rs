//! Ricewise RAG - Retrieval-augmented answers over rice research papers.
//!
//! This crate provides async clients for the hosted embedding model and the
//! hosted language model, an in-memory vector index, the answer pipeline that
//! ties them together, and the follow-up suggestion table.

mod client;
mod embeddings;
mod error;
pub mod index;
mod provider;
pub mod rag;
pub mod suggest;
mod types;

pub use client::GroqClient;
pub use embeddings::HfEmbeddingClient;
pub use error::{RagError, RagResult};
pub use index::{cosine_similarity, ScoredChunk, VectorIndex};
pub use provider::{ChatModel, Embedder};
pub use rag::{Answer, AnswerPipeline};
pub use suggest::{follow_up_questions, SuggestionCategory};
pub use types::*;

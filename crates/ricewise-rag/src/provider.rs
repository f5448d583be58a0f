//! Seams between the pipeline and the hosted models.

use crate::error::{RagError, RagResult};
use async_trait::async_trait;

/// Turns text into vectors. The same implementation must embed both the
/// indexed chunks and incoming questions.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, preserving order.
    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>>;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::UnexpectedResponse("no embedding returned".to_string()))
    }
}

/// Produces a completion for a single prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for logs.
    fn model_name(&self) -> &str;

    /// Generate a completion. Called once per question, never retried.
    async fn complete(&self, prompt: &str) -> RagResult<String>;
}

//! Retrieval-augmented answer pipeline.

use crate::error::RagResult;
use crate::index::{ScoredChunk, VectorIndex};
use crate::provider::{ChatModel, Embedder};
use ricewise_core::DocumentChunk;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Prompt sent to the language model. `{context}` and `{input}` are replaced
/// with the retrieved chunks and the question.
pub const PROMPT_TEMPLATE: &str = "
You are an AI assistant specializing in rice agriculture and disease management.
Use the research paper context to provide accurate, helpful answers to farmers and agricultural professionals.

Context from research papers:
{context}

Question: {input}

Instructions for your answer:
- Read the context above first before answering
- Use only information from the context when possible
- Provide practical, actionable advice for rice farmers
- Write clear, numbered points when listing information
- If the context doesn't contain relevant information, say so clearly
- Focus on rice diseases, treatments, prevention, and farming practices
- Keep answers concise but comprehensive

Answer:
";

/// Build the completion prompt from the question and retrieved chunks.
pub fn build_rag_prompt(question: &str, context: &[ScoredChunk]) -> String {
    let context = context
        .iter()
        .map(|scored| scored.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    // Substitute the question last so braces in it are never reinterpreted.
    PROMPT_TEMPLATE
        .replacen("{context}", &context, 1)
        .replacen("{input}", question, 1)
}

/// Result of answering one question.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The model's answer.
    pub text: String,
    /// Chunks given to the model, best first.
    pub chunks: Vec<DocumentChunk>,
    /// Time spent waiting for the language model.
    pub generation_time: Duration,
    /// Time for the whole pipeline: embed, retrieve and generate.
    pub total_time: Duration,
}

/// Embed a question, retrieve the closest chunks and ask the model.
pub struct AnswerPipeline {
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn ChatModel>,
    index: VectorIndex,
    top_k: usize,
}

impl AnswerPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn ChatModel>,
        index: VectorIndex,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            llm,
            index,
            top_k,
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Answer a question from the indexed papers.
    ///
    /// Every call re-embeds and re-queries; nothing is cached. The model is
    /// called exactly once and failures are returned as-is.
    pub async fn answer(&self, question: &str) -> RagResult<Answer> {
        let start = Instant::now();

        let query = self.embedder.embed(question).await?;
        let context = self.index.search(&query, self.top_k)?;
        debug!(
            "Retrieved {} chunks (best similarity {:.3})",
            context.len(),
            context.first().map(|c| c.similarity).unwrap_or(0.0)
        );

        let prompt = build_rag_prompt(question, &context);

        let generation_start = Instant::now();
        let text = self.llm.complete(&prompt).await?;
        let generation_time = generation_start.elapsed();
        let total_time = start.elapsed();

        info!(
            "Answer generated in {:.2}s ({:.2}s in {})",
            total_time.as_secs_f64(),
            generation_time.as_secs_f64(),
            self.llm.model_name()
        );

        Ok(Answer {
            text,
            chunks: context.into_iter().map(|scored| scored.chunk).collect(),
            generation_time,
            total_time,
        })
    }
}

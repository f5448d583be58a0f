//! Shared state handed to the HTTP handlers.

use anyhow::{Context, Result};
use ricewise_config::{Config, Credentials, RagConfig};
use ricewise_core::{round_seconds, ChatResponse, SourceSnippet};
use ricewise_ingest::{discover_pdfs, DocumentLoader};
use ricewise_rag::{
    follow_up_questions, Answer, AnswerPipeline, ChatModel, Embedder, GroqClient,
    HfEmbeddingClient, VectorIndex,
};
use ricewise_vision::Classifier;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// At most this many sources are returned with an answer.
pub const MAX_SOURCES: usize = 3;

/// Everything the chat endpoint needs once startup has finished.
pub struct ChatContext {
    pipeline: AnswerPipeline,
    rag: RagConfig,
}

impl ChatContext {
    pub fn new(pipeline: AnswerPipeline, rag: RagConfig) -> Self {
        Self { pipeline, rag }
    }

    /// Run the startup sequence: credentials, documents, model clients, index.
    ///
    /// Any failure aborts startup; there is no partially ready context.
    pub async fn initialize(config: &Config) -> Result<Self> {
        Self::initialize_with(config, |name| std::env::var(name).ok()).await
    }

    /// Same as [`ChatContext::initialize`], reading credentials through `lookup`.
    pub async fn initialize_with<F>(config: &Config, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::from_lookup(lookup).context("Missing API credentials")?;

        let folder = config.documents.folder_path();
        let files = discover_pdfs(&folder)?;
        info!("Found {} research papers in {}", files.len(), folder.display());

        let llm = GroqClient::from_config(&config.llm, credentials.groq_api_key)
            .context("Failed to create language model client")?;
        info!("Language model client ready ({})", config.llm.model);

        let embedder = HfEmbeddingClient::from_config(&config.embedding, credentials.hf_token)
            .context("Failed to create embedding client")?;

        Self::from_clients(config, Arc::new(embedder), Arc::new(llm)).await
    }

    /// Chunk the papers, embed them into an index and assemble the pipeline.
    pub async fn from_clients(
        config: &Config,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        let folder = config.documents.folder_path();
        let loader = DocumentLoader::from_config(&config.documents);
        let chunks = tokio::task::spawn_blocking(move || loader.load_folder(&folder))
            .await
            .context("Document loading task failed")??;

        let index = VectorIndex::build(
            embedder.as_ref(),
            chunks,
            config.embedding.batch_size,
            config.embedding.concurrency,
        )
        .await
        .context("Failed to build vector index")?;

        let pipeline = AnswerPipeline::new(embedder, llm, index, config.rag.top_k);
        Ok(Self::new(pipeline, config.rag.clone()))
    }

    pub fn pipeline(&self) -> &AnswerPipeline {
        &self.pipeline
    }

    pub fn max_question_chars(&self) -> usize {
        self.rag.max_question_chars
    }

    /// Shape a pipeline answer for the web client.
    pub fn build_response(&self, question: &str, answer: Answer) -> ChatResponse {
        let sources = answer
            .chunks
            .iter()
            .take(MAX_SOURCES)
            .enumerate()
            .map(|(rank, chunk)| SourceSnippet::from_chunk(rank, chunk, self.rag.snippet_chars))
            .collect();

        ChatResponse {
            answer: answer.text,
            confidence: self.rag.confidence,
            sources,
            suggestions: follow_up_questions(question),
            processing_time_seconds: round_seconds(answer.total_time.as_secs_f64()),
        }
    }
}

/// State of the chat service. Starts out initializing and becomes ready once.
#[derive(Default)]
pub struct AppState {
    chat: OnceLock<Arc<ChatContext>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chat context, once startup has finished.
    pub fn chat(&self) -> Option<&Arc<ChatContext>> {
        self.chat.get()
    }

    pub fn is_ready(&self) -> bool {
        self.chat.get().is_some()
    }

    /// Mark the service ready. Returns false if it already was.
    pub fn set_ready(&self, context: Arc<ChatContext>) -> bool {
        self.chat.set(context).is_ok()
    }
}

/// State of the classifier service; fully loaded before it starts serving.
pub struct ClassifierState {
    pub classifier: Arc<Classifier>,
}

impl ClassifierState {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ricewise_rag::RagResult;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn keys(name: &str) -> Option<String> {
        match name {
            "GROQ_API_KEY" => Some("gsk_test".to_string()),
            "HF_TOKEN" => Some("hf_test".to_string()),
            _ => None,
        }
    }

    fn config_for(folder: &Path) -> Config {
        let mut config = Config::default();
        config.documents.folder = folder.to_string_lossy().to_string();
        config
    }

    async fn startup_error<F>(config: &Config, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        match ChatContext::initialize_with(config, lookup).await {
            Ok(_) => panic!("startup should have failed"),
            Err(e) => format!("{:#}", e),
        }
    }

    #[derive(Default)]
    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    struct SilentModel;

    #[async_trait]
    impl ChatModel for SilentModel {
        fn model_name(&self) -> &str {
            "silent"
        }

        async fn complete(&self, _prompt: &str) -> RagResult<String> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_credentials_checked_before_documents() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir.path().join("papers_absent"));

        let message = startup_error(&config, |_| None).await;
        assert!(message.contains("GROQ_API_KEY"));
        assert!(!message.contains("papers_absent"));
    }

    #[tokio::test]
    async fn test_missing_folder_is_named() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("papers_absent");

        let message = startup_error(&config_for(&folder), keys).await;
        assert!(message.contains("not found"));
        assert!(message.contains(&folder.display().to_string()));
    }

    #[tokio::test]
    async fn test_empty_folder_is_named() {
        let dir = tempdir().unwrap();

        let message = startup_error(&config_for(dir.path()), keys).await;
        assert!(message.contains("No PDF files found"));
        assert!(message.contains(&dir.path().display().to_string()));
    }

    #[tokio::test]
    async fn test_unreadable_papers_abort_before_embedding() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.pdf"), b"this is not a pdf").unwrap();
        let embedder = Arc::new(CountingEmbedder::default());

        let result =
            ChatContext::from_clients(&config_for(dir.path()), embedder.clone(), Arc::new(SilentModel))
                .await;
        match result {
            Ok(_) => panic!("startup should have failed"),
            Err(e) => assert!(format!("{:#}", e).contains("No text could be extracted")),
        }
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }
}

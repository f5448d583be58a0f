//! Chat service command.

use crate::server::{self, router::chat_router, state::{AppState, ChatContext}};
use anyhow::{Context, Result};
use ricewise_config::Config;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tracing::info;

/// Run the chat service until shutdown or a startup failure.
pub fn run(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let rt = Runtime::new().context("Failed to create async runtime")?;
    rt.block_on(serve(config, host, port))
}

async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.chat_host.clone());
    let port = port.unwrap_or(config.server.chat_port);
    let bind_addr = format!("{}:{}", host, port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!("Chat service listening on {}", listener.local_addr()?);

    run_service(
        listener,
        &config.server.cors_allowed_origins,
        ChatContext::initialize(&config),
    )
    .await
}

/// Serve the chat routes on `listener` while `startup` builds the context.
///
/// Health checks are answered while startup runs. Returns when the server
/// stops, or with the startup error if startup fails.
async fn run_service<F>(listener: TcpListener, cors_origins: &[String], startup: F) -> Result<()>
where
    F: Future<Output = Result<ChatContext>>,
{
    let state = Arc::new(AppState::new());
    let app = chat_router(state.clone(), cors_origins);

    let startup = async {
        info!("Initializing Rice AI backend...");
        let context = startup.await.context("Backend initialization failed")?;
        state.set_ready(Arc::new(context));
        info!("Backend initialization complete");
        std::future::pending::<Result<()>>().await
    };

    tokio::select! {
        result = server::serve(listener, app) => result,
        result = startup => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use ricewise_config::RagConfig;
    use ricewise_core::{ChunkMetadata, DocumentChunk};
    use ricewise_rag::{AnswerPipeline, ChatModel, Embedder, RagResult, VectorIndex};
    use serde_json::Value;
    use std::time::Duration;
    use tokio::sync::oneshot;

    struct UnitEmbedder;

    #[async_trait]
    impl Embedder for UnitEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0]).collect())
        }
    }

    struct EchoModel;

    #[async_trait]
    impl ChatModel for EchoModel {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &str) -> RagResult<String> {
            Ok(prompt.to_string())
        }
    }

    fn context() -> ChatContext {
        let chunk = DocumentChunk::new(
            "Flooded fields suppress weeds.",
            ChunkMetadata {
                source: "paper.pdf".to_string(),
                page: 0,
                chunk_index: 0,
            },
        );
        let index = VectorIndex::from_embeddings(vec![chunk], vec![vec![1.0]]).unwrap();
        let pipeline = AnswerPipeline::new(Arc::new(UnitEmbedder), Arc::new(EchoModel), index, 3);
        ChatContext::new(pipeline, RagConfig::default())
    }

    async fn get_health(url: &str) -> Value {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        client.get(url).send().await.unwrap().json().await.unwrap()
    }

    #[tokio::test]
    async fn test_health_answers_during_startup_and_startup_failure_ends_service() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/health", listener.local_addr().unwrap());
        let (release, gate) = oneshot::channel::<()>();

        let startup = async move {
            let _ = gate.await;
            Err::<ChatContext, _>(anyhow!("Research papers folder 'research_papers' not found"))
        };
        let check_health = async move {
            let health = get_health(&url).await;
            let _ = release.send(());
            health
        };

        let (result, health) = tokio::join!(run_service(listener, &[], startup), check_health);
        assert_eq!(health["status"], "initializing");
        assert_eq!(health["models_loaded"], false);

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Backend initialization failed"));
        assert!(message.contains("not found"));
    }

    #[tokio::test]
    async fn test_service_becomes_healthy_after_startup() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/health", listener.local_addr().unwrap());

        let wait_until_healthy = async {
            for _ in 0..100 {
                let health = get_health(&url).await;
                if health["status"] == "healthy" {
                    return health;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            panic!("service never became healthy");
        };

        tokio::select! {
            result = run_service(listener, &[], async { Ok(context()) }) => {
                panic!("service stopped early: {:?}", result);
            }
            health = wait_until_healthy => {
                assert_eq!(health["models_loaded"], true);
            }
        }
    }
}

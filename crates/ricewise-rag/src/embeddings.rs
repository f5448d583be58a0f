//! Hugging Face feature-extraction client.

use crate::error::{RagError, RagResult};
use crate::provider::Embedder;
use crate::types::*;
use async_trait::async_trait;
use reqwest::Client;
use ricewise_config::EmbeddingConfig;
use std::time::Duration;
use tracing::debug;

/// Embeds text with a sentence-transformer hosted on the Hugging Face inference API.
#[derive(Clone)]
pub struct HfEmbeddingClient {
    client: Client,
    endpoint: String,
    token: String,
    model: String,
    timeout: Duration,
}

impl HfEmbeddingClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &EmbeddingConfig, token: impl Into<String>) -> RagResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RagError::Http)?;

        Ok(Self {
            client,
            endpoint: feature_extraction_url(&config.base_url, &config.model),
            token: token.into(),
            model: config.model.clone(),
            timeout,
        })
    }

    /// Model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }
}

fn feature_extraction_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/{}/pipeline/feature-extraction",
        base_url.trim_end_matches('/'),
        model.trim_matches('/')
    )
}

#[async_trait]
impl Embedder for HfEmbeddingClient {
    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        debug!("Embedding {} texts with {}", texts.len(), self.model);

        let request = FeatureExtractionRequest {
            inputs: texts,
            options: FeatureExtractionOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RagError::Connection {
                        host: self.endpoint.clone(),
                    }
                } else if e.is_timeout() {
                    RagError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    RagError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(RagError::Unauthorized {
                    service: "Hugging Face",
                    status: status.as_u16(),
                });
            }
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<HfErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(RagError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: FeatureExtractionResponse = response.json().await?;
        let embeddings = body.into_embeddings();
        if embeddings.len() != texts.len() {
            return Err(RagError::UnexpectedResponse(format!(
                "asked for {} embeddings, received {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }
}

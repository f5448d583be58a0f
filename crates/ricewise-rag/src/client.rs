//! Groq chat completion client.

use crate::error::{RagError, RagResult};
use crate::provider::ChatModel;
use crate::types::*;
use async_trait::async_trait;
use reqwest::{Client, Response};
use ricewise_config::LlmConfig;
use std::time::Duration;
use tracing::debug;

/// Client for an OpenAI-compatible chat completions API (Groq by default).
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl GroqClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &LlmConfig, api_key: impl Into<String>) -> RagResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RagError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest::new(&self.model, prompt).with_temperature(self.temperature)
    }

    fn map_send_error(&self, e: reqwest::Error) -> RagError {
        if e.is_connect() {
            RagError::Connection {
                host: self.base_url.clone(),
            }
        } else if e.is_timeout() {
            RagError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            RagError::Http(e)
        }
    }
}

/// Turn a non-success response into an error, preferring the API's own message.
async fn error_from_response(service: &'static str, response: Response) -> RagError {
    let status = response.status().as_u16();
    if status == 401 || status == 403 {
        return RagError::Unauthorized { service, status };
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);
    RagError::ApiError { status, message }
}

#[async_trait]
impl ChatModel for GroqClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> RagResult<String> {
        let url = self.completions_url();
        debug!(
            "Requesting completion from {} ({} prompt chars)",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(error_from_response("Groq", response).await);
        }

        let completion: ChatCompletionResponse = response.json().await?;
        if let Some(usage) = &completion.usage {
            debug!(
                "Completion used {} prompt + {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RagError::UnexpectedResponse("completion had no choices".to_string()))
    }
}

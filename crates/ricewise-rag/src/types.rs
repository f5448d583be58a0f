//! Request and response types for the hosted APIs.

use serde::{Deserialize, Serialize};

/// A message in an OpenAI-compatible chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Create a new single-turn completion request.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: None,
            stream: false,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting returned with a completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Response from `/chat/completions` (non-streaming).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Error envelope of OpenAI-compatible APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

/// Request body for the Hugging Face feature-extraction pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureExtractionRequest<'a> {
    pub inputs: &'a [String],
    pub options: FeatureExtractionOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureExtractionOptions {
    /// Block until a cold model is loaded instead of answering 503.
    pub wait_for_model: bool,
}

/// Response of the feature-extraction pipeline.
///
/// Sentence-transformer models return one pooled vector per input; plain
/// encoders return one vector per token, which is mean-pooled here.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureExtractionResponse {
    Pooled(Vec<Vec<f32>>),
    Tokens(Vec<Vec<Vec<f32>>>),
}

impl FeatureExtractionResponse {
    /// One vector per input.
    pub fn into_embeddings(self) -> Vec<Vec<f32>> {
        match self {
            Self::Pooled(vectors) => vectors,
            Self::Tokens(batch) => batch.into_iter().map(mean_pool).collect(),
        }
    }
}

fn mean_pool(tokens: Vec<Vec<f32>>) -> Vec<f32> {
    let Some(width) = tokens.first().map(Vec::len) else {
        return vec![];
    };
    let mut sum = vec![0.0f32; width];
    for token in &tokens {
        for (acc, v) in sum.iter_mut().zip(token) {
            *acc += v;
        }
    }
    let n = tokens.len() as f32;
    sum.iter_mut().for_each(|v| *v /= n);
    sum
}

/// Error body of the Hugging Face inference API.
#[derive(Debug, Clone, Deserialize)]
pub struct HfErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_builder() {
        let request = ChatCompletionRequest::new("llama-3.3-70b-versatile", "Hello")
            .with_temperature(0.2);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Hello");
        assert!((value["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(value["stream"], false);
    }

    #[test]
    fn test_completion_request_omits_unset_options() {
        let value = serde_json::to_value(ChatCompletionRequest::new("m", "p")).unwrap();
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn test_parse_completion_response() {
        let body = r#"{
            "id": "chatcmpl-1",
            "model": "llama-3.3-70b-versatile",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "1. Drain the field."}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].message.content, "1. Drain the field.");
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_pooled_embeddings() {
        let response: FeatureExtractionResponse =
            serde_json::from_str("[[0.1, 0.2], [0.3, 0.4]]").unwrap();
        assert_eq!(response.into_embeddings(), vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[test]
    fn test_token_embeddings_are_mean_pooled() {
        let response: FeatureExtractionResponse =
            serde_json::from_str("[[[1.0, 2.0], [3.0, 4.0]]]").unwrap();
        assert_eq!(response.into_embeddings(), vec![vec![2.0, 3.0]]);
    }
}

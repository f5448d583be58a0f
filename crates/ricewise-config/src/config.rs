//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::{expand_path, AppPaths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub documents: DocumentsConfig,

    #[serde(default)]
    pub rag: RagConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::default_config_string())?;
        Ok(())
    }

    /// Check the values that would otherwise fail deep inside a service.
    pub fn validate(&self) -> ConfigResult<()> {
        let docs = &self.documents;
        if docs.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "documents.chunk_size must be greater than 0".to_string(),
            ));
        }
        if docs.chunk_overlap >= docs.chunk_size {
            return Err(ConfigError::Invalid(format!(
                "documents.chunk_overlap ({}) must be smaller than documents.chunk_size ({})",
                docs.chunk_overlap, docs.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(ConfigError::Invalid(
                "rag.top_k must be greater than 0".to_string(),
            ));
        }
        if self.rag.max_question_chars == 0 {
            return Err(ConfigError::Invalid(
                "rag.max_question_chars must be greater than 0".to_string(),
            ));
        }
        if self.embedding.batch_size == 0 || self.embedding.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "embedding.batch_size and embedding.concurrency must be greater than 0"
                    .to_string(),
            ));
        }
        if self.classifier.input_size == 0 {
            return Err(ConfigError::Invalid(
                "classifier.input_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Ricewise Configuration
# Rice research-paper assistant and leaf disease classifier
#
# Credentials are read from the environment (or a .env file):
#   GROQ_API_KEY  - hosted language model
#   HF_TOKEN      - hosted embedding model

[server]
chat_host = "0.0.0.0"
chat_port = 8000
classifier_host = "0.0.0.0"
classifier_port = 5000

# Origins allowed by CORS. Empty means any origin.
cors_allowed_origins = []

[llm]
# OpenAI-compatible chat completions endpoint
base_url = "https://api.groq.com/openai/v1"
model = "llama-3.3-70b-versatile"
temperature = 0.7
timeout_seconds = 120

[embedding]
# Hugging Face inference endpoint; the model id is appended to base_url
base_url = "https://router.huggingface.co/hf-inference/models"
model = "sentence-transformers/all-MiniLM-L6-v2"
batch_size = 32                # Chunks per embedding request at startup
concurrency = 4                # Embedding requests in flight at startup
timeout_seconds = 120

[documents]
# Folder scanned for PDF research papers at startup
folder = "research_papers"
chunk_size = 1000              # Characters per chunk
chunk_overlap = 200            # Characters shared by neighbouring chunks

[rag]
top_k = 3                      # Chunks retrieved per question
max_question_chars = 4000
snippet_chars = 200            # Source text returned to the client
confidence = 0.95              # Reported confidence (fixed placeholder)

[classifier]
model_path = "rice_model.onnx"
class_names_path = "class_names.json"
input_size = 224
# Resampling filter: bicubic, bilinear or nearest
resample = "bicubic"
# Scale pixels to 0..1 before inference (the shipped model expects 0..255)
normalize = false
max_upload_bytes = 10485760
"#
        .to_string()
    }
}

/// HTTP listener settings for both services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub chat_host: String,
    pub chat_port: u16,
    pub classifier_host: String,
    pub classifier_port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            chat_host: "0.0.0.0".to_string(),
            chat_port: 8000,
            classifier_host: "0.0.0.0".to_string(),
            classifier_port: 5000,
            cors_allowed_origins: vec![],
        }
    }
}

/// Hosted language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            timeout_seconds: 120,
        }
    }
}

/// Hosted embedding model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub batch_size: usize,
    pub concurrency: usize,
    pub timeout_seconds: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.huggingface.co/hf-inference/models".to_string(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            batch_size: 32,
            concurrency: 4,
            timeout_seconds: 120,
        }
    }
}

/// Source document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub folder: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl DocumentsConfig {
    pub fn folder_path(&self) -> PathBuf {
        expand_path(&self.folder)
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            folder: "research_papers".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval and answer shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub top_k: usize,
    pub max_question_chars: usize,
    pub snippet_chars: usize,
    pub confidence: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_question_chars: 4000,
            snippet_chars: 200,
            confidence: 0.95,
        }
    }
}

/// Resampling filter used when resizing uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resample {
    Nearest,
    Bilinear,
    Bicubic,
}

/// Image classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub model_path: String,
    pub class_names_path: String,
    pub input_size: u32,
    pub resample: Resample,
    pub normalize: bool,
    pub max_upload_bytes: usize,
}

impl ClassifierConfig {
    pub fn model_file(&self) -> PathBuf {
        expand_path(&self.model_path)
    }

    pub fn class_names_file(&self) -> PathBuf {
        expand_path(&self.class_names_path)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: "rice_model.onnx".to_string(),
            class_names_path: "class_names.json".to_string(),
            input_size: 224,
            resample: Resample::Bicubic,
            normalize: false,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.documents.chunk_size, 1000);
        assert_eq!(config.documents.chunk_overlap, 200);
        assert_eq!(config.rag.top_k, 3);
        assert_eq!(config.classifier.input_size, 224);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_string_matches_defaults() {
        let parsed: Config = toml::from_str(&Config::default_config_string()).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.server.chat_port, defaults.server.chat_port);
        assert_eq!(parsed.embedding.model, defaults.embedding.model);
        assert_eq!(parsed.classifier.resample, defaults.classifier.resample);
        assert_eq!(parsed.rag.snippet_chars, defaults.rag.snippet_chars);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.llm.base_url, deserialized.llm.base_url);
        assert_eq!(config.documents.folder, deserialized.documents.folder);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [rag]
            top_k = 5

            [classifier]
            resample = "nearest"
            "#
        )
        .unwrap();

        let config = Config::load_from(temp_file.path()).unwrap();

        assert_eq!(config.rag.top_k, 5);
        assert_eq!(config.classifier.resample, Resample::Nearest);
        // Defaults should still work
        assert_eq!(config.rag.snippet_chars, 200);
        assert_eq!(config.server.chat_port, 8000);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.documents.folder, "research_papers");
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let mut config = Config::default();
        config.documents.chunk_overlap = 1000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.rag.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.server.chat_port = 9000;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.chat_port, 9000);
    }
}

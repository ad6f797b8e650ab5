//! Configuration file support for lnbot
//!
//! Config file location: ~/.config/lnbot/config.toml
//!
//! Example config:
//! ```toml
//! [llm]
//! provider = "openai"  # openai, ollama, anthropic, simulated
//! model = "gpt-3.5-turbo"
//! temperature = 0.0
//!
//! [embedding]
//! provider = "openai"  # openai, ollama, simulated
//! model = "text-embedding-ada-002"
//!
//! [index]
//! input_dir = "data"
//! output_dir = "data"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::embedding::DEFAULT_EMBEDDING_MODEL;
use crate::indexer::IndexerConfig;
use crate::llm::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::service::DEFAULT_SIMILARITY_TOP_K;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider type: openai, ollama, anthropic, simulated
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Host for Ollama (e.g., http://localhost:11434)
    pub host: Option<String>,

    /// Base URL for OpenAI-compatible or Anthropic APIs
    pub base_url: Option<String>,

    /// API key (falls back to OPENAI_API_KEY / ANTHROPIC_API_KEY)
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_llm_model(),
            temperature: default_temperature(),
            host: None,
            base_url: None,
            api_key: None,
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider type: openai, ollama, simulated
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    pub host: Option<String>,

    pub base_url: Option<String>,

    pub api_key: Option<String>,

    /// Batch size for embedding requests
    pub batch_size: Option<usize>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_embedding_model(),
            host: None,
            base_url: None,
            api_key: None,
            batch_size: None,
        }
    }
}

/// Index locations and build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory of source documents
    #[serde(default = "default_data_dir")]
    pub input_dir: PathBuf,

    /// Directory the index is persisted to
    #[serde(default = "default_data_dir")]
    pub output_dir: PathBuf,

    /// Chunk size in tokens
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Chunk overlap in tokens
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Nodes retrieved per query
    #[serde(default = "default_similarity_top_k")]
    pub similarity_top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            input_dir: default_data_dir(),
            output_dir: default_data_dir(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            similarity_top_k: default_similarity_top_k(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

fn default_similarity_top_k() -> usize {
    DEFAULT_SIMILARITY_TOP_K
}

const EXAMPLE_CONFIG: &str = r#"# lnbot configuration
# Location: ~/.config/lnbot/config.toml

[llm]
# Provider: openai, ollama, anthropic, simulated
provider = "openai"
model = "gpt-3.5-turbo"
temperature = 0.0

# Ollama host (default: http://localhost:11434)
# host = "http://localhost:11434"

# OpenAI-compatible / Anthropic base URL
# base_url = "https://api.openai.com/v1"

# API key (or set OPENAI_API_KEY / ANTHROPIC_API_KEY)
# api_key = "sk-..."

[embedding]
# Provider: openai, ollama, simulated
provider = "openai"
model = "text-embedding-ada-002"

# batch_size = 100

[index]
# Source documents and persisted index location
input_dir = "data"
output_dir = "data"

# Chunk size and overlap in tokens
chunk_size = 1024
chunk_overlap = 20

# Nodes retrieved per query
similarity_top_k = 2
"#;

impl Config {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lnbot")
            .join("config.toml")
    }

    /// The file to use: an explicit path if given, otherwise the default location
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit.unwrap_or_else(Self::config_path)
    }

    /// Load config from `path`, returning defaults if missing or invalid
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {:?}", path);
                    return config;
                }
                Err(e) => tracing::warn!("Failed to parse config file {:?}: {}", path, e),
            },
            Err(e) => tracing::warn!("Failed to read config file {:?}: {}", path, e),
        }
        Self::default()
    }

    /// Write the commented example config to `path`
    pub fn write_example(path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, EXAMPLE_CONFIG)?;
        Ok(())
    }

    /// Input and output directories for the indexer
    pub fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig::new(self.index.input_dir.clone(), self.index.output_dir.clone())
    }
}

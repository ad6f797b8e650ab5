//! Embedding module - compute embeddings from text

mod ollama;
mod openai;
mod simulated;
mod traits;
mod truncate;

pub use simulated::SimulatedEmbedding;
pub use traits::EmbeddingModel;
pub(crate) use truncate::{decode_prefix, tokenizer};

use async_trait::async_trait;
use tracing::info;

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Embedding mode configuration
#[derive(Debug, Clone)]
pub enum EmbeddingMode {
    OpenAI {
        api_key: Option<String>,
        base_url: Option<String>,
    },
    Ollama {
        host: Option<String>,
    },
    Simulated,
}

impl EmbeddingMode {
    /// Resolve a provider name from config or the command line
    pub fn from_name(
        name: &str,
        host: Option<String>,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let mode = match name {
            "openai" => EmbeddingMode::OpenAI { api_key, base_url },
            "ollama" => EmbeddingMode::Ollama { host },
            "simulated" => EmbeddingMode::Simulated,
            _ => anyhow::bail!("Unknown embedding mode: {}", name),
        };
        Ok(mode)
    }
}

/// Unified embedding provider
pub struct EmbeddingProvider {
    model_name: String,
    dimensions: usize,
    token_limit: usize,
    inner: EmbeddingProviderInner,
}

enum EmbeddingProviderInner {
    OpenAI(openai::OpenAIEmbedding),
    Ollama(ollama::OllamaEmbedding),
    Simulated(SimulatedEmbedding),
}

impl EmbeddingProvider {
    /// Create a new embedding provider
    pub fn new(
        model_name: String,
        mode: EmbeddingMode,
        batch_size: Option<usize>,
    ) -> anyhow::Result<Self> {
        let (inner, dimensions) = match mode {
            EmbeddingMode::OpenAI { api_key, base_url } => {
                let provider =
                    openai::OpenAIEmbedding::new(model_name.clone(), api_key, base_url, batch_size)?;
                let dims = provider.dimensions();
                (EmbeddingProviderInner::OpenAI(provider), dims)
            }
            EmbeddingMode::Ollama { host } => {
                let provider = ollama::OllamaEmbedding::new(model_name.clone(), host, batch_size)?;
                let dims = provider.dimensions();
                (EmbeddingProviderInner::Ollama(provider), dims)
            }
            EmbeddingMode::Simulated => {
                let provider = SimulatedEmbedding::new(model_name.clone());
                let dims = provider.dimensions();
                (EmbeddingProviderInner::Simulated(provider), dims)
            }
        };

        info!(
            "Initialized embedding provider: {} ({} dims)",
            model_name,
            if dimensions == 0 { "auto".to_string() } else { dimensions.to_string() }
        );

        Ok(Self {
            token_limit: truncate::get_token_limit(&model_name),
            model_name,
            dimensions,
            inner,
        })
    }
}

#[async_trait]
impl EmbeddingModel for EmbeddingProvider {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        let truncated = truncate::truncate_to_token_limit(texts, self.token_limit)?;
        let refs: Vec<&str> = truncated.iter().map(|s| s.as_str()).collect();

        match &self.inner {
            EmbeddingProviderInner::OpenAI(p) => p.embed(&refs).await,
            EmbeddingProviderInner::Ollama(p) => p.embed(&refs).await,
            EmbeddingProviderInner::Simulated(p) => p.embed(&refs).await,
        }
    }
}

//! Service context - model clients and settings threaded through building and querying

use std::sync::Arc;

use crate::chunker::{SentenceSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::config::Config;
use crate::embedding::{EmbeddingMode, EmbeddingModel, EmbeddingProvider};
use crate::llm::{LanguageModel, LlmProvider, LlmType};

/// Default number of nodes retrieved per query
pub const DEFAULT_SIMILARITY_TOP_K: usize = 2;

/// Default number of nodes embedded per request
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 10;

/// Bundle of model clients and parameters
#[derive(Clone)]
pub struct ServiceContext {
    pub llm: Arc<dyn LanguageModel>,
    pub embed_model: Arc<dyn EmbeddingModel>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub similarity_top_k: usize,
    pub embed_batch_size: usize,
    /// Draw progress bars while embedding
    pub show_progress: bool,
}

impl ServiceContext {
    /// Context with default settings around the given models
    pub fn new(llm: Arc<dyn LanguageModel>, embed_model: Arc<dyn EmbeddingModel>) -> Self {
        Self {
            llm,
            embed_model,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            similarity_top_k: DEFAULT_SIMILARITY_TOP_K,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
            show_progress: false,
        }
    }

    /// Build the context described by the application config
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let llm_type = LlmType::from_name(
            &config.llm.provider,
            config.llm.host.clone(),
            config.llm.api_key.clone(),
            config.llm.base_url.clone(),
        )?;
        let llm = LlmProvider::new(config.llm.model.clone(), llm_type, config.llm.temperature)?;

        let mode = EmbeddingMode::from_name(
            &config.embedding.provider,
            config.embedding.host.clone(),
            config.embedding.api_key.clone(),
            config.embedding.base_url.clone(),
        )?;
        let embed_model =
            EmbeddingProvider::new(config.embedding.model.clone(), mode, config.embedding.batch_size)?;

        let mut ctx = Self::new(Arc::new(llm), Arc::new(embed_model))
            .with_chunking(config.index.chunk_size, config.index.chunk_overlap)
            .with_similarity_top_k(config.index.similarity_top_k);
        if let Some(batch_size) = config.embedding.batch_size {
            ctx.embed_batch_size = batch_size.max(1);
        }
        Ok(ctx)
    }

    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_similarity_top_k(mut self, top_k: usize) -> Self {
        self.similarity_top_k = top_k;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Splitter configured with this context's chunking settings
    pub fn splitter(&self) -> anyhow::Result<SentenceSplitter> {
        SentenceSplitter::new(self.chunk_size, self.chunk_overlap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_simulated() {
        let mut config = Config::default();
        config.llm.provider = "simulated".into();
        config.embedding.provider = "simulated".into();
        config.embedding.batch_size = Some(0);
        config.index.similarity_top_k = 4;

        let ctx = ServiceContext::from_config(&config).unwrap();
        assert_eq!(ctx.llm.model_name(), config.llm.model);
        assert_eq!(ctx.embed_model.model_name(), config.embedding.model);
        assert_eq!(ctx.similarity_top_k, 4);
        assert_eq!(ctx.embed_batch_size, 1);
        assert_eq!(ctx.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_from_config_unknown_provider() {
        let mut config = Config::default();
        config.llm.provider = "davinci".into();
        assert!(ServiceContext::from_config(&config).is_err());
    }

    #[test]
    fn test_invalid_chunking_rejected_by_splitter() {
        let mut config = Config::default();
        config.llm.provider = "simulated".into();
        config.embedding.provider = "simulated".into();
        let ctx = ServiceContext::from_config(&config).unwrap().with_chunking(10, 10);
        assert!(ctx.splitter().is_err());
    }
}

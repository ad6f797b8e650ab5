//! Indexer - load or build an index, persist it, answer queries
//!
//! Construction always leaves an index in memory and a persisted copy in
//! `output_dir`. The persisted store is reused whenever `output_dir` holds a
//! `docstore.json`, without looking at `input_dir` or checking whether the
//! documents changed since the store was written.

use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::index::{Response, VectorStoreIndex};
use crate::reader::DirectoryReader;
use crate::service::ServiceContext;
use crate::storage;

/// Where documents are read from and where the index is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl IndexerConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// Owns one index for its whole lifetime
pub struct Indexer {
    config: IndexerConfig,
    service_context: ServiceContext,
    index: Option<VectorStoreIndex>,
}

impl Indexer {
    /// Load or build the index, then persist it
    pub async fn new(config: IndexerConfig, service_context: ServiceContext) -> anyhow::Result<Self> {
        let mut indexer = Self {
            config,
            service_context,
            index: None,
        };

        indexer.index = Some(indexer.load_index().await?);
        indexer.save_index()?;

        Ok(indexer)
    }

    /// Construct from the application config, building model clients from it
    pub async fn from_config(config: &Config, show_progress: bool) -> anyhow::Result<Self> {
        let service_context = ServiceContext::from_config(config)?.with_progress(show_progress);
        Self::new(config.indexer_config(), service_context).await
    }

    /// Rehydrate from `output_dir` if it holds a store, otherwise build from `input_dir`
    pub async fn load_index(&self) -> anyhow::Result<VectorStoreIndex> {
        let output_dir = &self.config.output_dir;

        if storage::is_persisted(output_dir) {
            info!("Loading index from {}", output_dir.display());
            return VectorStoreIndex::load_from_storage(output_dir, self.service_context.clone());
        }

        let documents = DirectoryReader::new(&self.config.input_dir).load_data()?;
        info!(
            "Loaded {} documents from {}",
            documents.len(),
            self.config.input_dir.display()
        );

        VectorStoreIndex::from_documents(&documents, self.service_context.clone()).await
    }

    /// Persist the current index to `output_dir`
    pub fn save_index(&self) -> anyhow::Result<()> {
        let index = self.index.as_ref().ok_or(Error::IndexNotLoaded)?;
        index.persist(&self.config.output_dir)
    }

    /// Answer a natural-language query from the index
    pub async fn query(&self, text_query: &str) -> anyhow::Result<Response> {
        if text_query.is_empty() {
            return Err(Error::EmptyQuery.into());
        }
        let index = self.index.as_ref().ok_or(Error::IndexNotLoaded)?;

        index.as_query_engine().query(text_query).await
    }

    pub fn index(&self) -> Option<&VectorStoreIndex> {
        self.index.as_ref()
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::embedding::SimulatedEmbedding;
    use crate::llm::SimulatedLlm;

    fn context() -> ServiceContext {
        ServiceContext::new(
            Arc::new(SimulatedLlm::default()),
            Arc::new(SimulatedEmbedding::default()),
        )
    }

    fn unloaded(config: IndexerConfig) -> Indexer {
        Indexer {
            config,
            service_context: context(),
            index: None,
        }
    }

    #[tokio::test]
    async fn test_query_without_index() {
        let indexer = unloaded(IndexerConfig::new("in", "out"));

        let err = indexer.query("What is a channel?").await.unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::IndexNotLoaded));

        let err = indexer.save_index().unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::IndexNotLoaded));
    }

    #[tokio::test]
    async fn test_empty_query_checked_before_index() {
        let indexer = unloaded(IndexerConfig::new("in", "out"));

        let err = indexer.query("").await.unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::EmptyQuery));
    }

    #[tokio::test]
    async fn test_load_index_missing_input_dir() {
        let out = tempfile::tempdir().unwrap();
        let indexer = unloaded(IndexerConfig::new("/nonexistent/lnbot/docs", out.path()));

        let err = indexer.load_index().await.err().unwrap();
        assert!(err.to_string().contains("does not exist"));
        assert!(!storage::is_persisted(out.path()));
    }

    #[tokio::test]
    async fn test_same_input_and_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("channels.md"), "Channels are funded on-chain.").unwrap();

        let config = IndexerConfig::new(dir.path(), dir.path());
        let first = Indexer::new(config.clone(), context()).await.unwrap();
        let first_id = first.index().unwrap().index_id().to_string();

        let second = Indexer::new(config, context()).await.unwrap();
        assert_eq!(second.index().unwrap().index_id(), first_id);
        assert_eq!(second.index().unwrap().docstore().document_count(), 1);
    }
}

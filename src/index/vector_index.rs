//! Vector store index - docstore, index struct and vectors held together

use std::path::Path;

use tracing::{info, warn};

use super::query::QueryEngine;
use crate::service::ServiceContext;
use crate::storage::{
    DocStore, IndexStore, VectorStore, DOCSTORE_FILE, INDEX_STORE_FILE, VECTOR_STORE_FILE,
};

/// A queryable index over document nodes
pub struct VectorStoreIndex {
    pub(super) index_store: IndexStore,
    pub(super) docstore: DocStore,
    pub(super) vector_store: VectorStore,
    pub(super) service_context: ServiceContext,
}

impl VectorStoreIndex {
    /// Rehydrate an index from a persist directory
    pub fn load_from_storage(
        persist_dir: &Path,
        service_context: ServiceContext,
    ) -> anyhow::Result<Self> {
        let docstore = DocStore::load(&persist_dir.join(DOCSTORE_FILE))?;
        let index_store = IndexStore::load(&persist_dir.join(INDEX_STORE_FILE))?;
        let vector_store =
            VectorStore::load(&persist_dir.join(VECTOR_STORE_FILE), index_store.dimensions)?;

        let configured = service_context.embed_model.model_name();
        if index_store.embedding_model != configured {
            warn!(
                "Index was built with embedding model '{}' but '{}' is configured; reusing it anyway",
                index_store.embedding_model, configured
            );
        }

        info!(
            "Loaded index {} ({} nodes from {} documents)",
            index_store.index_id,
            docstore.len(),
            docstore.document_count()
        );

        Ok(Self {
            index_store,
            docstore,
            vector_store,
            service_context,
        })
    }

    /// Write the docstore, index struct and vectors to `persist_dir`
    pub fn persist(&self, persist_dir: &Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(persist_dir)?;

        self.vector_store.persist(&persist_dir.join(VECTOR_STORE_FILE))?;
        self.index_store.save(&persist_dir.join(INDEX_STORE_FILE))?;
        // Written last: its presence marks the directory as a complete store
        self.docstore.save(&persist_dir.join(DOCSTORE_FILE))?;

        info!("Index persisted to {}", persist_dir.display());
        Ok(())
    }

    /// Query engine using the context's default top-k
    pub fn as_query_engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(self, self.service_context.similarity_top_k)
    }

    pub fn index_id(&self) -> &str {
        &self.index_store.index_id
    }

    pub fn docstore(&self) -> &DocStore {
        &self.docstore
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.vector_store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector_store.is_empty()
    }
}

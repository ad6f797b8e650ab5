//! Index construction from documents

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::vector_index::VectorStoreIndex;
use crate::chunker::Chunker;
use crate::reader::Document;
use crate::service::ServiceContext;
use crate::storage::{DocStore, IndexStore, VectorStore};

impl VectorStoreIndex {
    /// Chunk, embed and index documents
    pub async fn from_documents(
        documents: &[Document],
        service_context: ServiceContext,
    ) -> anyhow::Result<Self> {
        let nodes = service_context.splitter()?.get_nodes_from_documents(documents)?;
        if nodes.is_empty() {
            anyhow::bail!("Documents contain no text to index");
        }

        info!(
            "Building index from {} documents ({} nodes)",
            documents.len(),
            nodes.len()
        );

        let progress = if service_context.show_progress {
            let bar = ProgressBar::new(nodes.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} Generating embeddings ({eta})")?
                    .progress_chars("#>-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let embed_model = &service_context.embed_model;
        let mut embeddings = Vec::with_capacity(nodes.len());
        for batch in nodes.chunks(service_context.embed_batch_size.max(1)) {
            let texts: Vec<&str> = batch.iter().map(|n| n.text.as_str()).collect();
            let batch_embeddings = embed_model.embed(&texts).await?;
            if batch_embeddings.len() != batch.len() {
                anyhow::bail!(
                    "Embedding model returned {} vectors for {} texts",
                    batch_embeddings.len(),
                    batch.len()
                );
            }
            embeddings.extend(batch_embeddings);
            progress.inc(batch.len() as u64);
        }
        progress.finish_and_clear();

        let dimensions = embeddings.first().map(|e| e.len()).unwrap_or(0);
        debug!("Embedding dimensions: {}", dimensions);

        let vector_store = VectorStore::new(dimensions, nodes.len())?;
        for (key, embedding) in embeddings.iter().enumerate() {
            vector_store.add(key as u64, embedding)?;
        }

        let mut docstore = DocStore::new();
        docstore.add_nodes(&nodes);

        let index_store = IndexStore::new(
            embed_model.model_name().to_string(),
            dimensions,
            nodes.iter().map(|n| n.id.clone()).collect(),
        );

        Ok(Self {
            index_store,
            docstore,
            vector_store,
            service_context,
        })
    }
}

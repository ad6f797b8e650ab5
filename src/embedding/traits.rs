//! Embedding model trait

use async_trait::async_trait;

/// Trait for embedding models used to build and query an index
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Model identifier, recorded in the persisted index
    fn model_name(&self) -> &str;

    /// Expected embedding dimensions (0 when unknown until the first call)
    fn dimensions(&self) -> usize;

    /// Compute embeddings for texts, one vector per input in order
    async fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>>;
}

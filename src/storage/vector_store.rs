//! Vector store - HNSW index using the usearch crate

use std::path::Path;

use tracing::{debug, info};
use usearch::{Index, IndexOptions, MetricKind, ScalarKind};

/// HNSW graph degree
const CONNECTIVITY: usize = 32;

/// Candidate list size for insertion and search
const EXPANSION: usize = 64;

/// In-memory HNSW index over node embeddings, keyed by node position
pub struct VectorStore {
    index: Index,
    dimensions: usize,
}

impl VectorStore {
    /// Create an empty store with room for `capacity` vectors
    pub fn new(dimensions: usize, capacity: usize) -> anyhow::Result<Self> {
        if dimensions == 0 {
            anyhow::bail!("Vector store dimensions must be greater than zero");
        }

        let index = Index::new(&index_options(dimensions))?;
        index.reserve(capacity.max(1))?;

        Ok(Self { index, dimensions })
    }

    /// Load a persisted store
    pub fn load(path: &Path, dimensions: usize) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Vector store file not found: {}", path.display());
        }

        let index = Index::new(&index_options(dimensions))?;
        index.load(path.to_string_lossy().as_ref())?;

        info!("Loaded vector store with {} vectors", index.size());

        Ok(Self { index, dimensions })
    }

    /// Persist to `path`, overwriting any previous file
    pub fn persist(&self, path: &Path) -> anyhow::Result<()> {
        self.index.save(path.to_string_lossy().as_ref())?;
        debug!("Vector store saved to {:?}", path);
        Ok(())
    }

    /// Add one embedding under `key`
    pub fn add(&self, key: u64, embedding: &[f32]) -> anyhow::Result<()> {
        if embedding.len() != self.dimensions {
            anyhow::bail!(
                "Embedding dimension mismatch: expected {}, got {}",
                self.dimensions,
                embedding.len()
            );
        }

        if self.index.size() >= self.index.capacity() {
            self.index.reserve(self.index.capacity() * 2)?;
        }
        self.index.add(key, embedding)?;
        Ok(())
    }

    /// Top-k nearest keys with cosine similarity, best first
    pub fn query(&self, embedding: &[f32], top_k: usize) -> anyhow::Result<Vec<(u64, f32)>> {
        if embedding.len() != self.dimensions {
            anyhow::bail!(
                "Query embedding dimension mismatch: expected {}, got {}",
                self.dimensions,
                embedding.len()
            );
        }
        if top_k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self.index.search(embedding, top_k)?;

        // usearch reports cosine distance
        Ok(matches
            .keys
            .iter()
            .zip(matches.distances.iter())
            .map(|(key, distance)| (*key, 1.0 - *distance))
            .collect())
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn index_options(dimensions: usize) -> IndexOptions {
    IndexOptions {
        dimensions,
        metric: MetricKind::Cos,
        quantization: ScalarKind::F32,
        connectivity: CONNECTIVITY,
        expansion_add: EXPANSION,
        expansion_search: EXPANSION,
        multi: false,
    }
}

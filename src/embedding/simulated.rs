//! Simulated embedding model for offline runs and tests
//!
//! Feature-hashes lowercase word tokens into a fixed-size vector and
//! L2-normalizes it. Texts sharing words end up close in cosine space, which
//! is enough for retrieval to behave sensibly without a remote model.

use std::hash::Hasher;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use rustc_hash::FxHasher;

use super::EmbeddingModel;

/// Dimensions of simulated embeddings
pub const SIMULATED_DIMENSIONS: usize = 256;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9]+").expect("token regex is valid")
});

/// Deterministic hashing embedder
pub struct SimulatedEmbedding {
    model_name: String,
}

impl SimulatedEmbedding {
    pub fn new(model_name: String) -> Self {
        Self { model_name }
    }

    /// Embed one text
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; SIMULATED_DIMENSIONS];

        for token in TOKEN_REGEX.find_iter(text) {
            let token = token.as_str().to_lowercase();
            if token.len() < 2 {
                continue;
            }
            let mut hasher = FxHasher::default();
            hasher.write(token.as_bytes());
            let hash = hasher.finish();

            let bucket = (hash % SIMULATED_DIMENSIONS as u64) as usize;
            let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        } else {
            // Keep the vector usable under cosine distance
            vector[0] = 1.0;
        }
        vector
    }
}

impl Default for SimulatedEmbedding {
    fn default() -> Self {
        Self::new("simulated".to_string())
    }
}

#[async_trait]
impl EmbeddingModel for SimulatedEmbedding {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> usize {
        SIMULATED_DIMENSIONS
    }

    async fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

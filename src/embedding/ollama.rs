//! Ollama embedding provider

use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http::{check_response, create_client};

/// Ollama embedding provider
pub struct OllamaEmbedding {
    client: Client,
    host: String,
    model_name: String,
    dimensions: usize,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedding {
    /// Create a new Ollama embedding provider
    pub fn new(
        model_name: String,
        host: Option<String>,
        batch_size: Option<usize>,
    ) -> anyhow::Result<Self> {
        let host = host
            .or_else(|| env::var("OLLAMA_HOST").ok())
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        let client = create_client()?;

        let dimensions = match model_name.split(':').next().unwrap_or(&model_name) {
            "nomic-embed-text" => 768,
            "mxbai-embed-large" | "bge-m3" | "snowflake-arctic-embed" => 1024,
            "all-minilm" => 384,
            _ => 0,
        };

        info!("Ollama embedding provider: {} @ {}", model_name, host);

        Ok(Self {
            client,
            host,
            model_name,
            dimensions,
            batch_size: batch_size.unwrap_or(32).max(1),
        })
    }

    /// Get dimensions
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Compute embeddings
    pub async fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let request = EmbedRequest {
                model: &self.model_name,
                input: batch,
            };

            let response = self
                .client
                .post(format!("{}/api/embed", self.host.trim_end_matches('/')))
                .json(&request)
                .send()
                .await?;

            let response = check_response(response, "Ollama").await?;
            let embed_response: EmbedResponse = response.json().await?;

            if embed_response.embeddings.len() != batch.len() {
                anyhow::bail!(
                    "Ollama returned {} embeddings for {} inputs",
                    embed_response.embeddings.len(),
                    batch.len()
                );
            }
            all_embeddings.extend(embed_response.embeddings);
        }

        Ok(all_embeddings)
    }
}

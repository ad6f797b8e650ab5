//! OpenAI embedding provider

use std::env;

use async_openai::{
    config::OpenAIConfig,
    types::{CreateEmbeddingRequestArgs, EmbeddingInput},
    Client,
};
use tracing::{debug, info};

/// Maximum inputs per request accepted by the embeddings endpoint
const MAX_BATCH_SIZE: usize = 2048;

/// OpenAI embedding provider
pub struct OpenAIEmbedding {
    client: Client<OpenAIConfig>,
    model_name: String,
    dimensions: usize,
    batch_size: usize,
}

impl OpenAIEmbedding {
    /// Create a new OpenAI embedding provider
    pub fn new(
        model_name: String,
        api_key: Option<String>,
        base_url: Option<String>,
        batch_size: Option<usize>,
    ) -> anyhow::Result<Self> {
        let api_key = api_key
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY not set"))?;

        let mut config = OpenAIConfig::new().with_api_key(api_key);

        if let Some(base_url) = base_url.or_else(|| env::var("OPENAI_BASE_URL").ok()) {
            config = config.with_api_base(base_url);
        }

        let client = Client::with_config(config);

        // Unknown models are sized by the first response
        let dimensions = match model_name.as_str() {
            "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
            "text-embedding-3-large" => 3072,
            _ => 0,
        };

        info!("OpenAI embedding provider: {}", model_name);

        Ok(Self {
            client,
            model_name,
            dimensions,
            batch_size: batch_size.unwrap_or(100).clamp(1, MAX_BATCH_SIZE),
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
            let input: Vec<String> = batch.iter().map(|s| s.to_string()).collect();
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model_name)
                .input(EmbeddingInput::StringArray(input))
                .build()?;

            let mut response = self.client.embeddings().create(request).await?;

            // Results carry their input position; keep input order
            response.data.sort_by_key(|d| d.index);
            debug!("Embedded batch of {} texts", response.data.len());

            all_embeddings.extend(response.data.into_iter().map(|d| d.embedding));
        }

        Ok(all_embeddings)
    }
}

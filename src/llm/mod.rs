//! LLM module - language model providers for answer synthesis

mod anthropic;
mod ollama;
mod openai;
mod simulated;

pub use simulated::SimulatedLlm;

use async_trait::async_trait;
use tracing::info;

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Answers are synthesized deterministically
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Trait for anything that can complete a prompt
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier sent to the provider
    fn model_name(&self) -> &str;

    /// Complete a single prompt
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// LLM provider type
#[derive(Debug, Clone)]
pub enum LlmType {
    Ollama { host: Option<String> },
    OpenAI { api_key: Option<String>, base_url: Option<String> },
    Anthropic { api_key: Option<String>, base_url: Option<String> },
    Simulated,
}

impl LlmType {
    /// Resolve a provider name from config or the command line
    pub fn from_name(
        name: &str,
        host: Option<String>,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let llm_type = match name {
            "openai" => LlmType::OpenAI { api_key, base_url },
            "ollama" => LlmType::Ollama { host },
            "anthropic" => LlmType::Anthropic { api_key, base_url },
            "simulated" => LlmType::Simulated,
            _ => anyhow::bail!("Unknown LLM provider: {}", name),
        };
        Ok(llm_type)
    }
}

/// Unified LLM provider
pub struct LlmProvider {
    model_name: String,
    inner: LlmProviderInner,
}

enum LlmProviderInner {
    Ollama(ollama::OllamaLlm),
    OpenAI(openai::OpenAILlm),
    Anthropic(anthropic::AnthropicLlm),
    Simulated(SimulatedLlm),
}

impl LlmProvider {
    /// Create a new LLM provider
    pub fn new(model_name: String, llm_type: LlmType, temperature: f32) -> anyhow::Result<Self> {
        let inner = match llm_type {
            LlmType::Ollama { host } => LlmProviderInner::Ollama(ollama::OllamaLlm::new(
                model_name.clone(),
                host,
                temperature,
            )?),
            LlmType::OpenAI { api_key, base_url } => LlmProviderInner::OpenAI(
                openai::OpenAILlm::new(model_name.clone(), api_key, base_url, temperature)?,
            ),
            LlmType::Anthropic { api_key, base_url } => LlmProviderInner::Anthropic(
                anthropic::AnthropicLlm::new(model_name.clone(), api_key, base_url, temperature)?,
            ),
            LlmType::Simulated => LlmProviderInner::Simulated(SimulatedLlm::new(model_name.clone())),
        };

        info!("Initialized LLM provider: {} (temperature {})", model_name, temperature);

        Ok(Self { model_name, inner })
    }
}

#[async_trait]
impl LanguageModel for LlmProvider {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        match &self.inner {
            LlmProviderInner::Ollama(llm) => llm.generate(prompt).await,
            LlmProviderInner::OpenAI(llm) => llm.generate(prompt).await,
            LlmProviderInner::Anthropic(llm) => llm.generate(prompt).await,
            LlmProviderInner::Simulated(llm) => llm.complete(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert!(matches!(
            LlmType::from_name("simulated", None, None, None).unwrap(),
            LlmType::Simulated
        ));
        assert!(matches!(
            LlmType::from_name("ollama", Some("http://gpu:11434".into()), None, None).unwrap(),
            LlmType::Ollama { host: Some(_) }
        ));

        let err = LlmType::from_name("davinci", None, None, None).unwrap_err();
        assert!(err.to_string().contains("Unknown LLM provider"));
    }

    #[tokio::test]
    async fn test_simulated_provider_dispatch() {
        let llm = LlmProvider::new("sim".into(), LlmType::Simulated, DEFAULT_TEMPERATURE).unwrap();
        assert_eq!(llm.model_name(), "sim");
        let answer = llm.complete("Query: what is a channel?\nAnswer: ").await.unwrap();
        assert!(!answer.is_empty());
    }
}

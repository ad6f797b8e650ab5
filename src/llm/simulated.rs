//! Simulated LLM for offline runs and tests
//!
//! Returns a deterministic answer built from the prompt itself, so no
//! external API call or credential is needed.

use async_trait::async_trait;

use super::LanguageModel;

/// Delimiter around the context block of the text-QA prompt
const CONTEXT_DELIMITER: &str = "---------------------";

/// Simulated LLM provider
pub struct SimulatedLlm {
    model_name: String,
}

impl SimulatedLlm {
    /// Create a new simulated LLM
    pub fn new(model_name: String) -> Self {
        Self { model_name }
    }
}

impl Default for SimulatedLlm {
    fn default() -> Self {
        Self::new("simulated".to_string())
    }
}

#[async_trait]
impl LanguageModel for SimulatedLlm {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let query = prompt
            .split("Query:")
            .nth(1)
            .and_then(|s| s.lines().next())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or("your question");

        // Context sits between the first two delimiters
        let context = prompt
            .split(CONTEXT_DELIMITER)
            .nth(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());

        let response = match context {
            Some(context) => format!(
                "Based on the provided context, regarding \"{query}\": {}\n\n\
                 (simulated response from model {})",
                first_sentence(context),
                self.model_name
            ),
            None => format!(
                "I understand you're asking about \"{query}\". This is a simulated \
                 response (model {}).",
                self.model_name
            ),
        };

        Ok(response)
    }
}

/// First sentence of a block of text, or the whole first line
fn first_sentence(text: &str) -> &str {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or(text).trim();
    match line.find(['.', '!', '?']) {
        Some(pos) => &line[..=pos],
        None => line,
    }
}

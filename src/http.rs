//! HTTP utilities for model providers

use std::time::Duration;

use reqwest::{Client, Response};

/// Create a reqwest client shared by the REST-based providers
///
/// Timeouts here are the only ones in the system: 120 seconds per request,
/// 30 seconds to connect.
pub fn create_client() -> anyhow::Result<Client> {
    let client = Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

/// Check HTTP response status and return the API's own error message if not successful
pub async fn check_response(response: Response, service_name: &str) -> anyhow::Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    anyhow::bail!("{} API error {}: {}", service_name, status, error_detail(body))
}

/// Pull a readable message out of a JSON error body, falling back to the raw body
fn error_detail(body: String) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) else {
        return body;
    };

    // OpenAI/Anthropic: {"error": {"message": ..}}, Ollama: {"error": ".."}
    json.get("error")
        .and_then(|e| e.get("message").and_then(|m| m.as_str()).or_else(|| e.as_str()))
        .or_else(|| json.get("message").and_then(|m| m.as_str()))
        .or_else(|| json.get("detail").and_then(|d| d.as_str()))
        .map(|s| s.to_string())
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        assert!(create_client().is_ok());
    }

    #[test]
    fn test_error_detail_formats() {
        let openai = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(error_detail(openai.to_string()), "Incorrect API key provided");

        let ollama = r#"{"error": "model 'llama3' not found"}"#;
        assert_eq!(error_detail(ollama.to_string()), "model 'llama3' not found");

        assert_eq!(error_detail("Bad Gateway".to_string()), "Bad Gateway");
    }
}

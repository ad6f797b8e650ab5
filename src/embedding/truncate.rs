//! Token truncation using tiktoken

use std::sync::OnceLock;

use tiktoken_rs::{cl100k_base, CoreBPE, Rank};
use tracing::warn;

/// Shared cl100k_base encoder, loaded once per process
pub fn tokenizer() -> anyhow::Result<&'static CoreBPE> {
    static BPE: OnceLock<CoreBPE> = OnceLock::new();

    if let Some(bpe) = BPE.get() {
        return Ok(bpe);
    }
    let bpe = cl100k_base()?;
    Ok(BPE.get_or_init(|| bpe))
}

/// Decode the longest run of leading tokens, at most `limit`, that ends on a
/// character boundary. Returns the text and the number of tokens used; that
/// number is zero when the first character alone needs more than `limit` tokens.
pub(crate) fn decode_prefix(bpe: &CoreBPE, tokens: &[Rank], limit: usize) -> (String, usize) {
    for end in (1..=limit.min(tokens.len())).rev() {
        if let Ok(text) = bpe.decode(tokens[..end].to_vec()) {
            return (text, end);
        }
    }
    (String::new(), 0)
}

/// Token limits for common embedding models
pub fn get_token_limit(model_name: &str) -> usize {
    let base_name = model_name.split(':').next().unwrap_or(model_name);

    match base_name {
        "text-embedding-3-small" | "text-embedding-3-large" | "text-embedding-ada-002" => 8191,
        "nomic-embed-text" => 2048,
        "mxbai-embed-large" | "all-minilm" | "snowflake-arctic-embed" => 512,
        "bge-m3" => 8192,
        _ => 2048,
    }
}

/// Truncate texts to fit within token limit
pub fn truncate_to_token_limit(texts: &[&str], token_limit: usize) -> anyhow::Result<Vec<String>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let bpe = tokenizer()?;

    let mut truncated = Vec::with_capacity(texts.len());
    let mut truncation_count = 0;

    for (i, text) in texts.iter().enumerate() {
        let tokens = bpe.encode_with_special_tokens(text);
        let original_length = tokens.len();

        if original_length <= token_limit {
            truncated.push(text.to_string());
            continue;
        }

        let (kept, _) = decode_prefix(bpe, &tokens, token_limit);
        truncated.push(kept);
        truncation_count += 1;

        if truncation_count <= 3 {
            warn!(
                "Text {} truncated: {} → {} tokens",
                i + 1,
                original_length,
                token_limit
            );
        }
    }

    if truncation_count > 3 {
        warn!("{}/{} texts truncated to {} tokens", truncation_count, texts.len(), token_limit);
    }

    Ok(truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_limit_lookup() {
        assert_eq!(get_token_limit("text-embedding-ada-002"), 8191);
        assert_eq!(get_token_limit("nomic-embed-text:latest"), 2048);
        assert_eq!(get_token_limit("unknown-model"), 2048);
    }

    #[test]
    fn test_short_text_untouched() {
        let result = truncate_to_token_limit(&["Hello world"], 100).unwrap();
        assert_eq!(result, vec!["Hello world".to_string()]);
    }

    #[test]
    fn test_long_text_truncated() {
        let long = "channel ".repeat(500);
        let result = truncate_to_token_limit(&[long.as_str()], 10).unwrap();
        let bpe = tokenizer().unwrap();
        assert!(bpe.encode_with_special_tokens(&result[0]).len() <= 10);
        assert!(result[0].len() < long.len());
    }

    #[test]
    fn test_truncation_keeps_whole_characters() {
        for text in ["🙂x".repeat(600), "网🙂🙂".repeat(600), "闪电网络通道🙂".repeat(50)] {
            for limit in [7, 10, 11, 12, 13] {
                let result = truncate_to_token_limit(&[text.as_str()], limit).unwrap();
                assert!(text.starts_with(&result[0]));
                assert!(!result[0].is_empty());
                assert!(result[0].len() < text.len());
            }
        }
    }

    #[test]
    fn test_decode_prefix_backs_off_to_char_boundary() {
        let bpe = tokenizer().unwrap();
        let text = "通道🙂通道🙂";
        let tokens = bpe.encode_with_special_tokens(text);

        for limit in 0..=tokens.len() {
            let (prefix, used) = decode_prefix(bpe, &tokens, limit);
            assert!(used <= limit);
            assert!(text.starts_with(&prefix));
            assert_eq!(prefix.is_empty(), used == 0);
        }
        assert_eq!(decode_prefix(bpe, &tokens, tokens.len()).0, text);
    }
}

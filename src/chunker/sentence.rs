//! Token-aware sentence splitter

use tiktoken_rs::CoreBPE;

use super::Chunker;
use crate::embedding::{decode_prefix, tokenizer};

/// A piece of text that is never broken further unless it alone exceeds the chunk size
struct Split {
    text: String,
    tokens: usize,
}

/// Splits text into chunks of at most `chunk_size` tokens, preferring
/// sentence boundaries and falling back to words
pub struct SentenceSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    bpe: &'static CoreBPE,
}

impl SentenceSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> anyhow::Result<Self> {
        if chunk_size == 0 {
            anyhow::bail!("Chunk size must be greater than zero");
        }
        if chunk_overlap >= chunk_size {
            anyhow::bail!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap,
                chunk_size
            );
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            bpe: tokenizer()?,
        })
    }

    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    /// Break text into splits that each fit in a chunk
    fn splits(&self, text: &str) -> anyhow::Result<Vec<Split>> {
        let mut splits = Vec::new();

        for sentence in split_sentences(text) {
            let tokens = self.count_tokens(sentence);
            if tokens <= self.chunk_size {
                splits.push(Split { text: sentence.to_string(), tokens });
                continue;
            }

            for word in sentence.split_inclusive(char::is_whitespace) {
                let tokens = self.count_tokens(word);
                if tokens <= self.chunk_size {
                    splits.push(Split { text: word.to_string(), tokens });
                    continue;
                }

                // A single oversized word: cut on token windows ending at character boundaries
                let encoded = self.bpe.encode_with_special_tokens(word);
                let mut rest = encoded.as_slice();
                while !rest.is_empty() {
                    let (mut text, mut used) = decode_prefix(self.bpe, rest, self.chunk_size);
                    if used == 0 {
                        // First character is wider than a chunk, take it whole
                        (text, used) = (1..=rest.len())
                            .find_map(|end| self.bpe.decode(rest[..end].to_vec()).ok().map(|t| (t, end)))
                            .ok_or_else(|| anyhow::anyhow!("Token sequence is not valid UTF-8"))?;
                    }
                    splits.push(Split { text, tokens: used });
                    rest = &rest[used..];
                }
            }
        }

        Ok(splits)
    }
}

impl Chunker for SentenceSplitter {
    fn split_text(&self, text: &str) -> anyhow::Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut chunks = Vec::new();
        let mut current: Vec<Split> = Vec::new();
        let mut current_tokens = 0;

        for split in self.splits(text)? {
            if current_tokens + split.tokens > self.chunk_size && !current.is_empty() {
                push_chunk(&mut chunks, &current);

                // Carry the trailing splits that fit in the overlap
                let mut keep = 0;
                let mut kept_tokens = 0;
                for s in current.iter().rev() {
                    if kept_tokens + s.tokens > self.chunk_overlap {
                        break;
                    }
                    kept_tokens += s.tokens;
                    keep += 1;
                }
                current.drain(..current.len() - keep);
                current_tokens = kept_tokens;

                while current_tokens + split.tokens > self.chunk_size && !current.is_empty() {
                    current_tokens -= current.remove(0).tokens;
                }
            }

            current_tokens += split.tokens;
            current.push(split);
        }

        push_chunk(&mut chunks, &current);
        Ok(chunks)
    }
}

fn push_chunk(chunks: &mut Vec<String>, splits: &[Split]) {
    let text: String = splits.iter().map(|s| s.text.as_str()).collect();
    let text = text.trim();
    if !text.is_empty() {
        chunks.push(text.to_string());
    }
}

/// Split text after sentence-ending punctuation or paragraph breaks,
/// keeping trailing whitespace attached to the preceding sentence
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let boundary = match c {
            '.' | '!' | '?' => matches!(chars.peek(), Some((_, n)) if n.is_whitespace()),
            '\n' => matches!(chars.peek(), Some((_, '\n'))),
            _ => false,
        };
        if !boundary {
            continue;
        }

        let mut end = i + c.len_utf8();
        while let Some(&(j, n)) = chars.peek() {
            if !n.is_whitespace() {
                break;
            }
            end = j + n.len_utf8();
            chars.next();
        }
        sentences.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

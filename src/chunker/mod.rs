//! Chunking module - split documents into nodes for embedding
//!
//! Nodes are the unit of embedding and retrieval. Each one remembers the
//! document it came from (`ref_doc_id`) and carries the document's metadata
//! plus its position within that document.

mod sentence;

pub use sentence::SentenceSplitter;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reader::Document;

/// Default chunk size in tokens
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Default overlap between consecutive chunks in tokens
pub const DEFAULT_CHUNK_OVERLAP: usize = 20;

/// A chunk of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub ref_doc_id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Trait for splitting text into chunks
pub trait Chunker {
    /// Split text into chunk texts, in order
    fn split_text(&self, text: &str) -> anyhow::Result<Vec<String>>;

    /// Split documents into nodes
    fn get_nodes_from_documents(&self, documents: &[Document]) -> anyhow::Result<Vec<Node>> {
        let mut nodes = Vec::new();

        for document in documents {
            for (chunk_index, text) in self.split_text(&document.text)?.into_iter().enumerate() {
                let mut metadata = match &document.metadata {
                    serde_json::Value::Object(map) => map.clone(),
                    _ => serde_json::Map::new(),
                };
                metadata.insert("chunk_index".to_string(), chunk_index.into());

                nodes.push(Node {
                    id: Uuid::new_v4().to_string(),
                    ref_doc_id: document.id.clone(),
                    text,
                    metadata: serde_json::Value::Object(metadata),
                });
            }
        }

        Ok(nodes)
    }
}

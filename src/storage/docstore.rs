//! Document store - nodes keyed by id, plus per-document node lists

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunker::Node;

/// Nodes produced from one source document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefDocInfo {
    pub node_ids: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Document store persisted as `docstore.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocStore {
    #[serde(rename = "docstore/data")]
    nodes: BTreeMap<String, Node>,

    #[serde(rename = "docstore/ref_doc_info", default)]
    ref_doc_info: BTreeMap<String, RefDocInfo>,
}

impl DocStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add nodes, recording them under their source document
    pub fn add_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            let info = self.ref_doc_info.entry(node.ref_doc_id.clone()).or_default();
            if info.metadata.is_null() {
                info.metadata = doc_level_metadata(&node.metadata);
            }
            if !info.node_ids.contains(&node.id) {
                info.node_ids.push(node.id.clone());
            }
            self.nodes.insert(node.id.clone(), node.clone());
        }
    }

    pub fn get_node(&self, id: &str) -> anyhow::Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("Node not found in docstore: {}", id))
    }

    pub fn ref_doc_info(&self) -> &BTreeMap<String, RefDocInfo> {
        &self.ref_doc_info
    }

    /// Number of source documents
    pub fn document_count(&self) -> usize {
        self.ref_doc_info.len()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store: DocStore = serde_json::from_str(&content)?;
        Ok(store)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Node metadata without the chunk-specific fields
fn doc_level_metadata(metadata: &serde_json::Value) -> serde_json::Value {
    let mut metadata = metadata.clone();
    if let Some(map) = metadata.as_object_mut() {
        map.remove("chunk_index");
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, doc: &str, chunk_index: usize) -> Node {
        Node {
            id: id.to_string(),
            ref_doc_id: doc.to_string(),
            text: format!("text of {id}"),
            metadata: serde_json::json!({"file_name": format!("{doc}.md"), "chunk_index": chunk_index}),
        }
    }

    #[test]
    fn test_add_nodes_groups_by_document() {
        let mut store = DocStore::new();
        store.add_nodes(&[node("n1", "d1", 0), node("n2", "d1", 1), node("n3", "d2", 0)]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.document_count(), 2);
        assert_eq!(store.ref_doc_info()["d1"].node_ids, vec!["n1", "n2"]);
        assert_eq!(store.ref_doc_info()["d1"].metadata, serde_json::json!({"file_name": "d1.md"}));
        assert_eq!(store.get_node("n3").unwrap().text, "text of n3");
        assert!(store.get_node("missing").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docstore.json");

        let mut store = DocStore::new();
        store.add_nodes(&[node("n1", "d1", 0)]);
        store.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("docstore/data").is_some());
        assert!(raw.get("docstore/ref_doc_info").is_some());

        assert_eq!(DocStore::load(&path).unwrap(), store);
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docstore.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(DocStore::load(&path).is_err());
    }
}

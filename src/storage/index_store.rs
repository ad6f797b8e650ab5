//! Index store - the index struct persisted alongside the docstore

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current on-disk format version
pub const FORMAT_VERSION: &str = "1.0";

/// Index struct persisted as `index_store.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStore {
    /// Format version
    pub version: String,

    /// Index identifier
    pub index_id: String,

    /// Embedding model the vectors were computed with
    pub embedding_model: String,

    /// Embedding dimensions
    pub dimensions: usize,

    /// Node ids; position `i` is vector key `i` in the vector store
    pub node_ids: Vec<String>,
}

impl IndexStore {
    pub fn new(embedding_model: String, dimensions: usize, node_ids: Vec<String>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            index_id: Uuid::new_v4().to_string(),
            embedding_model,
            dimensions,
            node_ids,
        }
    }

    /// Node id for a vector key
    pub fn node_id(&self, key: u64) -> Option<&str> {
        usize::try_from(key)
            .ok()
            .and_then(|i| self.node_ids.get(i))
            .map(|s| s.as_str())
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store: IndexStore = serde_json::from_str(&content)?;
        Ok(store)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_lookup() {
        let store = IndexStore::new("m".into(), 4, vec!["a".into(), "b".into()]);
        assert_eq!(store.node_id(1), Some("b"));
        assert_eq!(store.node_id(2), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index_store.json");

        let store = IndexStore::new("text-embedding-ada-002".into(), 1536, vec!["n1".into()]);
        store.save(&path).unwrap();

        let loaded = IndexStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.version, FORMAT_VERSION);
    }
}

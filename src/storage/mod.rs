//! Storage module - the persisted form of an index
//!
//! A persist directory holds three artifacts:
//! - `docstore.json`: nodes and which document each came from
//! - `index_store.json`: index id, node order, embedding model and dimensions
//! - `vector_store.index`: the HNSW vector index (usearch format)
//!
//! The presence of `docstore.json` is what marks a directory as a persisted store.

mod docstore;
mod index_store;
mod vector_store;

pub use docstore::{DocStore, RefDocInfo};
pub use index_store::IndexStore;
pub use vector_store::VectorStore;

use std::path::Path;

pub const DOCSTORE_FILE: &str = "docstore.json";
pub const INDEX_STORE_FILE: &str = "index_store.json";
pub const VECTOR_STORE_FILE: &str = "vector_store.index";

/// Whether `dir` holds a persisted store
pub fn is_persisted(dir: &Path) -> bool {
    dir.join(DOCSTORE_FILE).exists()
}

/// Whether a file name is one of the store's own artifacts
pub fn is_store_artifact(file_name: &str) -> bool {
    matches!(file_name, DOCSTORE_FILE | INDEX_STORE_FILE | VECTOR_STORE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_persisted_keys_on_docstore_only() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_persisted(dir.path()));

        std::fs::write(dir.path().join(INDEX_STORE_FILE), "{}").unwrap();
        assert!(!is_persisted(dir.path()));

        std::fs::write(dir.path().join(DOCSTORE_FILE), "{}").unwrap();
        assert!(is_persisted(dir.path()));
    }

    #[test]
    fn test_store_artifacts() {
        assert!(is_store_artifact("docstore.json"));
        assert!(is_store_artifact("vector_store.index"));
        assert!(!is_store_artifact("lightning.md"));
    }
}

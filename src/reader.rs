//! Directory reader - loads every file in a directory as a document

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage;

/// A source document with its text and file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Document {
    /// Create a document with a fresh ID
    pub fn new(text: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            metadata,
        }
    }
}

/// Reader over a directory of documents
pub struct DirectoryReader {
    input_dir: PathBuf,
    required_exts: Option<Vec<String>>,
    recursive: bool,
    include_hidden: bool,
}

impl DirectoryReader {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            required_exts: None,
            recursive: true,
            include_hidden: false,
        }
    }

    /// Only load files with these extensions (e.g. `.md`, `.txt`)
    pub fn with_required_exts(mut self, exts: Vec<String>) -> Self {
        self.required_exts = Some(exts);
        self
    }

    /// Descend into subdirectories (default: true)
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Also load dotfiles and files under dot-directories (default: false)
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Load all documents, sorted by path
    pub fn load_data(&self) -> anyhow::Result<Vec<Document>> {
        if !self.input_dir.is_dir() {
            anyhow::bail!("Directory {} does not exist", self.input_dir.display());
        }

        let walker = WalkBuilder::new(&self.input_dir)
            .hidden(!self.include_hidden)
            .git_ignore(true)
            .git_global(true)
            .max_depth(if self.recursive { None } else { Some(1) })
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        let mut documents = Vec::new();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !self.accepts(path) {
                continue;
            }

            match load_file_content(path) {
                Ok(Some(text)) => {
                    debug!("Loaded {}", path.display());
                    documents.push(Document::new(text, file_metadata(path)));
                }
                Ok(None) => warn!("Skipping {}: no readable text", path.display()),
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        if documents.is_empty() {
            anyhow::bail!("No files found in {}", self.input_dir.display());
        }

        Ok(documents)
    }

    /// Whether a file should be loaded
    fn accepts(&self, path: &Path) -> bool {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if storage::is_store_artifact(file_name) {
            return false;
        }

        match &self.required_exts {
            Some(exts) => {
                let ext = path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                    .unwrap_or_default();
                exts.iter().any(|e| e.to_lowercase() == ext)
            }
            None => true,
        }
    }
}

fn file_metadata(path: &Path) -> serde_json::Value {
    let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    serde_json::json!({
        "file_path": path.to_string_lossy(),
        "file_name": path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
        "file_size": file_size,
    })
}

/// Load file content, handling different file types
///
/// `Ok(None)` means the file has no usable text (binary, empty extraction).
fn load_file_content(path: &Path) -> anyhow::Result<Option<String>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        #[cfg(feature = "pdf")]
        "pdf" => {
            let text = pdf_extract::extract_text(path)?;
            let text = text.trim();
            Ok((!text.is_empty()).then(|| text.to_string()))
        }
        _ => {
            let bytes = std::fs::read(path)?;
            Ok(String::from_utf8(bytes).ok())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory() {
        let err = DirectoryReader::new("/nonexistent/lnbot/input").load_data().unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = DirectoryReader::new(dir.path()).load_data().unwrap_err();
        assert!(err.to_string().contains("No files found"));
    }

    #[test]
    fn test_loads_all_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "Second").unwrap();
        std::fs::write(dir.path().join("a.txt"), "First").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.txt"), "Third").unwrap();

        let docs = DirectoryReader::new(dir.path()).load_data().unwrap();
        let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second", "Third"]);
        assert_eq!(docs[0].metadata["file_name"], "a.txt");
        assert_eq!(docs[0].metadata["file_size"], 5);
    }

    #[test]
    fn test_non_recursive_and_extension_filter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.md"), "md").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "txt").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("deep.md"), "deep").unwrap();

        let docs = DirectoryReader::new(dir.path())
            .with_recursive(false)
            .with_required_exts(vec![".MD".to_string()])
            .load_data()
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "md");
    }

    #[test]
    fn test_skips_store_artifacts_and_binary() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("guide.md"), "Open a channel").unwrap();
        std::fs::write(dir.path().join(storage::DOCSTORE_FILE), "{}").unwrap();
        std::fs::write(dir.path().join(storage::INDEX_STORE_FILE), "{}").unwrap();
        std::fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let docs = DirectoryReader::new(dir.path()).load_data().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "Open a channel");
    }

    #[test]
    fn test_hidden_files_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("visible.md"), "visible").unwrap();
        std::fs::write(dir.path().join(".draft.md"), "draft").unwrap();

        let docs = DirectoryReader::new(dir.path()).load_data().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "visible");

        let docs = DirectoryReader::new(dir.path()).with_hidden(true).load_data().unwrap();
        let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["draft", "visible"]);
    }

    #[test]
    fn test_multibyte_text_loaded_intact() {
        let dir = tempfile::tempdir().unwrap();
        let text = "闪电网络通道🙂 Ödeme kanalı açık.";
        std::fs::write(dir.path().join("通道.md"), text).unwrap();

        let docs = DirectoryReader::new(dir.path()).load_data().unwrap();
        assert_eq!(docs[0].text, text);
        assert_eq!(docs[0].metadata["file_name"], "通道.md");
        assert_eq!(docs[0].metadata["file_size"], text.len() as u64);
    }

    #[test]
    fn test_document_ids_unique() {
        let a = Document::new("x", serde_json::Value::Null);
        let b = Document::new("x", serde_json::Value::Null);
        assert_ne!(a.id, b.id);
    }
}

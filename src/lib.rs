//! lnbot - answer questions over a directory of documents
//!
//! Documents are chunked, embedded and stored in a vector index that is
//! persisted next to them; queries retrieve the closest chunks and ask an LLM
//! to answer from them.

pub mod chunker;
pub mod config;
pub mod embedding;
pub mod error;
mod http;
pub mod index;
pub mod indexer;
pub mod llm;
pub mod reader;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::Error;
pub use index::{Response, VectorStoreIndex};
pub use indexer::{Indexer, IndexerConfig};
pub use service::ServiceContext;

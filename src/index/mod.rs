//! Index module - building, persisting and querying a vector store index

mod builder;
mod query;
mod vector_index;

pub use query::{NodeWithScore, QueryEngine, Response, EMPTY_RESPONSE};
pub use vector_index::VectorStoreIndex;

//! Errors raised locally by the indexer
//!
//! Everything else (filesystem, store parsing, provider HTTP failures) travels
//! as `anyhow::Error` untouched. Callers that need to tell these two apart can
//! `downcast_ref::<Error>()` on the returned error.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Invalid argument: the query string was empty
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// Invalid state: no index is held by the indexer
    #[error("Index not loaded")]
    IndexNotLoaded,
}

impl Error {
    /// Process exit code used by the binary for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::EmptyQuery => 2,
            Error::IndexNotLoaded => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::EmptyQuery.to_string(), "Query cannot be empty");
        assert_eq!(Error::IndexNotLoaded.to_string(), "Index not loaded");
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = Error::EmptyQuery.into();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::EmptyQuery));
        assert_eq!(Error::IndexNotLoaded.exit_code(), 3);
    }
}

//! Namespace error types.

use std::io;
use thiserror::Error;

use crate::store::StoreError;

/// Failure kinds exposed by the namespace engine.
#[derive(Debug, Error)]
pub enum NamespaceError {
    /// The path is neither a blob nor a synthesized directory.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store could not be queried.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// A stream open, seek or read failed after the blob was resolved.
    #[error("read failed for {key}: {source}")]
    ReadFailure {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Write-family operation on a read-only namespace.
    #[error("{0} is not supported on a read-only filesystem")]
    Unsupported(&'static str),
}

impl NamespaceError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    pub fn read_failure(key: impl Into<String>, source: impl Into<io::Error>) -> Self {
        Self::ReadFailure {
            key: key.into(),
            source: source.into(),
        }
    }

    /// Returns true for the expected "nothing here" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Namespace result type.
pub type NamespaceResult<T> = Result<T, NamespaceError>;

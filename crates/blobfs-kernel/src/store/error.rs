//! Store client error types.

use std::io;
use thiserror::Error;

/// Errors reported by store clients.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A read stream was requested for a key with no blob.
    #[error("no blob stored at {0}")]
    BlobMissing(String),

    /// A pattern could not be compiled by the store.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// SQLite failure.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn blob_missing(key: impl Into<String>) -> Self {
        Self::BlobMissing(key.into())
    }
}

impl From<StoreError> for io::Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::BlobMissing(key) => io::Error::new(io::ErrorKind::NotFound, key),
            StoreError::Io(e) => e,
            other => io::Error::other(other),
        }
    }
}

/// Store result type.
pub type StoreResult<T> = Result<T, StoreError>;

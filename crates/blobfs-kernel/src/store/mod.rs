//! Flat blob store clients.
//!
//! The namespace engine consumes exactly four store capabilities, captured
//! by [`BlobStore`]:
//!
//! - exact key lookup
//! - literal-prefix pattern query ([`KeyPattern`])
//! - seekable read stream for one blob
//! - aggregate size statistics
//!
//! Two clients ship with the crate:
//!
//! - [`MemoryBlobStore`] - in-process map, regex-evaluated patterns (tests, demos)
//! - [`SqliteBlobStore`] - single-table SQLite store with incremental blob I/O

mod error;
mod memory;
mod sqlite;

use async_trait::async_trait;
use serde::Serialize;
use std::time::SystemTime;
use tokio::io::{AsyncRead, AsyncSeek};

use crate::namespace::{BlobKey, KeyPattern};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;

/// Store-side description of one blob.
///
/// A snapshot taken per query; never cached by the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobMetadata {
    /// Full store key.
    pub key: BlobKey,
    /// Length in bytes.
    pub size: u64,
    /// Upload time.
    pub created: SystemTime,
}

impl BlobMetadata {
    /// Last segment of the key.
    pub fn name(&self, separator: char) -> &str {
        let key = self.key.as_str();
        key.rsplit(separator).next().unwrap_or(key)
    }
}

/// Aggregate store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of stored blobs.
    pub blob_count: u64,
    /// Sum of all blob lengths in bytes.
    pub total_size: u64,
}

/// A single-use, seekable read stream over one blob.
pub trait BlobReadStream: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> BlobReadStream for T {}

/// Client interface to a flat blob store.
///
/// Implementations must be safe for concurrent use; the namespace engine
/// shares one client across all callers and adds no locking of its own.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Look up a blob by exact key.
    async fn find_exact(&self, key: &BlobKey) -> StoreResult<Option<BlobMetadata>>;

    /// All blobs whose key matches `pattern`, in key order.
    ///
    /// Honors [`KeyPattern::limit`].
    async fn find_by_pattern(&self, pattern: &KeyPattern) -> StoreResult<Vec<BlobMetadata>>;

    /// Open a read stream positioned at the start of the blob.
    async fn open_read_stream(&self, key: &BlobKey) -> StoreResult<Box<dyn BlobReadStream>>;

    /// Blob count and total stored bytes.
    async fn store_stats(&self) -> StoreResult<StoreStats>;
}

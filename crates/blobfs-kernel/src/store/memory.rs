//! In-memory blob store.
//!
//! Used for testing and demos. Pattern queries are evaluated the way a
//! document store evaluates them server-side: the pattern is rendered to a
//! regular expression and matched against every key.

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use super::{BlobMetadata, BlobReadStream, BlobStore, StoreError, StoreResult, StoreStats};
use crate::namespace::{BlobKey, KeyPattern};

#[derive(Debug, Clone)]
struct StoredBlob {
    data: Arc<[u8]>,
    created: SystemTime,
}

impl StoredBlob {
    fn metadata(&self, key: &str) -> BlobMetadata {
        BlobMetadata {
            key: BlobKey::from_raw(key),
            size: self.data.len() as u64,
            created: self.created,
        }
    }
}

/// In-memory blob store.
///
/// Thread-safe via internal `RwLock`. All data is lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<String, StoredBlob>>,
    offline: AtomicBool,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `key`, replacing any existing blob.
    ///
    /// This is the store's own loading API; the filesystem never calls it.
    pub fn put(&self, key: impl Into<String>, data: impl Into<Vec<u8>>) -> BlobMetadata {
        self.put_at(key, data, SystemTime::now())
    }

    /// Store `data` under `key` with an explicit upload time.
    pub fn put_at(
        &self,
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
        created: SystemTime,
    ) -> BlobMetadata {
        let key = key.into();
        let data: Vec<u8> = data.into();
        let blob = StoredBlob {
            data: Arc::from(data),
            created,
        };
        let meta = blob.metadata(&key);
        self.blobs.write().insert(key, blob);
        meta
    }

    /// Simulate an outage: every call fails with [`StoreError::Unavailable`]
    /// until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::unavailable("memory store is offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn find_exact(&self, key: &BlobKey) -> StoreResult<Option<BlobMetadata>> {
        self.check_online()?;
        let blobs = self.blobs.read();
        Ok(blobs.get(key.as_str()).map(|b| b.metadata(key.as_str())))
    }

    async fn find_by_pattern(&self, pattern: &KeyPattern) -> StoreResult<Vec<BlobMetadata>> {
        self.check_online()?;
        let re = Regex::new(&pattern.to_regex())?;
        let limit = pattern.limit().unwrap_or(usize::MAX);

        let blobs = self.blobs.read();
        Ok(blobs
            .iter()
            .filter(|(key, _)| re.is_match(key))
            .take(limit)
            .map(|(key, blob)| blob.metadata(key))
            .collect())
    }

    async fn open_read_stream(&self, key: &BlobKey) -> StoreResult<Box<dyn BlobReadStream>> {
        self.check_online()?;
        let blobs = self.blobs.read();
        let blob = blobs
            .get(key.as_str())
            .ok_or_else(|| StoreError::blob_missing(key.as_str()))?;
        Ok(Box::new(Cursor::new(Arc::clone(&blob.data))))
    }

    async fn store_stats(&self) -> StoreResult<StoreStats> {
        self.check_online()?;
        let blobs = self.blobs.read();
        Ok(StoreStats {
            blob_count: blobs.len() as u64,
            total_size: blobs.values().map(|b| b.data.len() as u64).sum(),
        })
    }
}

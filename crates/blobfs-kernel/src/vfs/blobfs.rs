//! Read-only filesystem over a blob namespace.
//!
//! Translates [`NamespaceEntry`] into host-facing [`FileAttr`] /
//! [`DirEntry`] values and rejects every write-family call before it can
//! reach the store.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::config::BlobFsConfig;
use crate::namespace::{Namespace, NamespaceEntry, NamespaceError};
use crate::store::BlobStore;
use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::ops::VfsOps;
use crate::vfs::types::{DirEntry, FileAttr, FileHandle, FreeSpace, OpenFlags, SetAttr};

/// Read-only [`VfsOps`] implementation backed by a [`Namespace`].
///
/// Handle ids come from a counter local to this adapter; everything else
/// is resolved against the store on every call.
#[derive(Debug)]
pub struct BlobFs {
    namespace: Namespace,
    free_space: u64,
    next_handle: AtomicU64,
}

impl BlobFs {
    /// Create a filesystem reporting `free_space` bytes free.
    pub fn new(namespace: Namespace, free_space: u64) -> Self {
        Self {
            namespace,
            free_space,
            next_handle: AtomicU64::new(1),
        }
    }

    /// Build from configuration and an opened store.
    pub fn from_config(config: &BlobFsConfig, store: Arc<dyn BlobStore>) -> Self {
        Self::new(config.namespace(store), config.free_space)
    }

    /// The namespace this filesystem serves.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn attr_for(entry: &NamespaceEntry) -> FileAttr {
        match entry {
            NamespaceEntry::File(meta) => FileAttr::file(meta.size, meta.created),
            NamespaceEntry::Directory { timestamp, .. } => FileAttr::directory(*timestamp),
        }
    }

    fn dir_entry(&self, entry: &NamespaceEntry) -> DirEntry {
        let separator = self.namespace.paths().separator();
        DirEntry::new(entry.name(separator), Self::attr_for(entry))
    }

    async fn resolve(&self, op: &'static str, path: &str) -> VfsResult<NamespaceEntry> {
        self.namespace
            .resolve(path)
            .await
            .map_err(VfsError::from)
            .inspect_err(|e| log_failure(op, path, e))
    }

    fn reject<T>(op: &'static str, path: &str) -> VfsResult<T> {
        tracing::debug!(op, path, "rejected write on read-only filesystem");
        Err(NamespaceError::Unsupported(op).into())
    }
}

fn log_failure(op: &str, path: &str, err: &VfsError) {
    match err {
        VfsError::Io(e) => tracing::warn!(op, path, error = %e, "store fault"),
        other => tracing::debug!(op, path, error = %other, "request failed"),
    }
}

#[async_trait]
impl VfsOps for BlobFs {
    async fn getattr(&self, path: &str) -> VfsResult<FileAttr> {
        let entry = self.resolve("getattr", path).await?;
        Ok(Self::attr_for(&entry))
    }

    async fn open(&self, path: &str, flags: OpenFlags) -> VfsResult<FileHandle> {
        if flags.wants_write() {
            return Self::reject("open for writing", path);
        }
        let entry = self.resolve("open", path).await?;
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(path, id, "opened");
        Ok(FileHandle {
            id,
            attr: Self::attr_for(&entry),
        })
    }

    async fn release(&self, handle: FileHandle) -> VfsResult<()> {
        tracing::trace!(id = handle.id, "released");
        Ok(())
    }

    async fn readdir(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        let key = self.namespace.normalize(path);
        if !self.namespace.paths().is_root(&key) {
            let entry = self.resolve("readdir", path).await?;
            if entry.is_file() {
                return Err(VfsError::not_a_directory(key.as_str()));
            }
        }

        let listing = self
            .namespace
            .list_children(path)
            .await
            .map_err(VfsError::from)
            .inspect_err(|e| log_failure("readdir", path, e))?;
        Ok(listing.iter().map(|e| self.dir_entry(e)).collect())
    }

    async fn read(&self, path: &str, offset: u64, size: u32) -> VfsResult<Vec<u8>> {
        let meta = match self.resolve("read", path).await? {
            NamespaceEntry::File(meta) => meta,
            NamespaceEntry::Directory { .. } => {
                return Err(VfsError::is_a_directory(
                    self.namespace.normalize(path).into_string(),
                ));
            }
        };

        let available = meta.size.saturating_sub(offset);
        let len = available.min(u64::from(size)) as usize;
        let mut buf = vec![0u8; len];
        let n = self
            .namespace
            .read_blob(&meta, offset, &mut buf)
            .await
            .map_err(VfsError::from)
            .inspect_err(|e| log_failure("read", path, e))?;
        buf.truncate(n);
        Ok(buf)
    }

    async fn write(&self, path: &str, _offset: u64, _data: &[u8]) -> VfsResult<u32> {
        Self::reject("write", path)
    }

    async fn create(&self, path: &str, _mode: u32) -> VfsResult<FileAttr> {
        Self::reject("create", path)
    }

    async fn mkdir(&self, path: &str, _mode: u32) -> VfsResult<FileAttr> {
        Self::reject("mkdir", path)
    }

    async fn unlink(&self, path: &str) -> VfsResult<()> {
        Self::reject("unlink", path)
    }

    async fn rmdir(&self, path: &str) -> VfsResult<()> {
        Self::reject("rmdir", path)
    }

    async fn rename(&self, from: &str, _to: &str) -> VfsResult<()> {
        Self::reject("rename", from)
    }

    async fn truncate(&self, path: &str, _size: u64) -> VfsResult<()> {
        Self::reject("truncate", path)
    }

    async fn setattr(&self, path: &str, _attr: SetAttr) -> VfsResult<FileAttr> {
        Self::reject("setattr", path)
    }

    async fn set_times(
        &self,
        path: &str,
        _atime: Option<SystemTime>,
        _mtime: Option<SystemTime>,
    ) -> VfsResult<()> {
        Self::reject("set_times", path)
    }

    async fn flush(&self, path: &str) -> VfsResult<()> {
        Self::reject("flush", path)
    }

    async fn lock(&self, path: &str, _offset: u64, _len: u64) -> VfsResult<()> {
        Self::reject("lock", path)
    }

    async fn unlock(&self, path: &str, _offset: u64, _len: u64) -> VfsResult<()> {
        Self::reject("unlock", path)
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn free_space(&self) -> VfsResult<FreeSpace> {
        let stats = self
            .namespace
            .store()
            .store_stats()
            .await
            .map_err(|e| VfsError::from(NamespaceError::from(e)))
            .inspect_err(|e| log_failure("free_space", "", e))?;
        Ok(FreeSpace {
            available: self.free_space,
            total: self.free_space.saturating_add(stats.total_size),
            total_free: self.free_space,
        })
    }

    async fn unmount(&self) -> VfsResult<()> {
        tracing::info!(root = %self.namespace.paths().root(), "unmounted");
        Ok(())
    }
}

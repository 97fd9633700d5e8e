//! VFS operations trait.
//!
//! This trait is the boundary a filesystem-driver host calls into. It is
//! path-based (no inodes) with explicit offset/size on reads, so a host can
//! map it onto FUSE, Dokan or an RPC protocol without handle state.

use async_trait::async_trait;
use std::time::SystemTime;

use super::types::{DirEntry, FileAttr, FileHandle, FreeSpace, OpenFlags, SetAttr};
use super::VfsResult;

/// Core VFS operations trait.
///
/// Paths use the configured driver separator (`/` by default) and are
/// relative to the filesystem root.
#[async_trait]
pub trait VfsOps: Send + Sync {
    // ========================================================================
    // Reading
    // ========================================================================

    /// Get file attributes (stat).
    async fn getattr(&self, path: &str) -> VfsResult<FileAttr>;

    /// Open a file or directory.
    async fn open(&self, path: &str, flags: OpenFlags) -> VfsResult<FileHandle>;

    /// Release a handle returned by [`open`](Self::open).
    async fn release(&self, handle: FileHandle) -> VfsResult<()>;

    /// Read directory entries.
    ///
    /// Returns all entries in the directory (no pagination).
    async fn readdir(&self, path: &str) -> VfsResult<Vec<DirEntry>>;

    /// Read file contents.
    ///
    /// Reads up to `size` bytes starting at `offset`.
    /// Returns fewer bytes if EOF is reached.
    async fn read(&self, path: &str, offset: u64, size: u32) -> VfsResult<Vec<u8>>;

    // ========================================================================
    // Writing
    // ========================================================================

    /// Write data to a file.
    async fn write(&self, path: &str, offset: u64, data: &[u8]) -> VfsResult<u32>;

    /// Create a new file.
    async fn create(&self, path: &str, mode: u32) -> VfsResult<FileAttr>;

    /// Create a new directory.
    async fn mkdir(&self, path: &str, mode: u32) -> VfsResult<FileAttr>;

    /// Remove a file.
    async fn unlink(&self, path: &str) -> VfsResult<()>;

    /// Remove an empty directory.
    async fn rmdir(&self, path: &str) -> VfsResult<()>;

    /// Rename a file or directory.
    async fn rename(&self, from: &str, to: &str) -> VfsResult<()>;

    /// Truncate a file to the specified size.
    async fn truncate(&self, path: &str, size: u64) -> VfsResult<()>;

    /// Set file attributes.
    async fn setattr(&self, path: &str, attr: SetAttr) -> VfsResult<FileAttr>;

    /// Set access and modification times.
    async fn set_times(
        &self,
        path: &str,
        atime: Option<SystemTime>,
        mtime: Option<SystemTime>,
    ) -> VfsResult<()>;

    /// Flush buffered writes for a file.
    async fn flush(&self, path: &str) -> VfsResult<()>;

    /// Lock a byte range.
    async fn lock(&self, path: &str, offset: u64, len: u64) -> VfsResult<()>;

    /// Unlock a byte range.
    async fn unlock(&self, path: &str, offset: u64, len: u64) -> VfsResult<()>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Returns true if this filesystem is read-only.
    fn read_only(&self) -> bool;

    /// Get free-space figures.
    async fn free_space(&self) -> VfsResult<FreeSpace>;

    /// Called by the host when the filesystem is unmounted.
    async fn unmount(&self) -> VfsResult<()>;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Check if a path exists.
    async fn exists(&self, path: &str) -> bool {
        self.getattr(path).await.is_ok()
    }

    /// Read entire file contents.
    ///
    /// Convenience method that reads the whole file.
    async fn read_all(&self, path: &str) -> VfsResult<Vec<u8>> {
        let attr = self.getattr(path).await?;
        let size = u32::try_from(attr.size).unwrap_or(u32::MAX);
        self.read(path, 0, size).await
    }
}

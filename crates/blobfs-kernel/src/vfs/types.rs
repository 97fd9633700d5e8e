//! Filesystem boundary types.
//!
//! These types are what a filesystem-driver host sees. They are path-based
//! (no inodes) and serializable, so a host can forward them over any
//! transport.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Permission bits reported for blobs.
pub const FILE_PERM: u32 = 0o444;
/// Permission bits reported for synthesized directories.
pub const DIR_PERM: u32 = 0o555;

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file (a stored blob).
    File,
    /// Directory (synthesized from key prefixes).
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// File attributes (metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttr {
    /// Size in bytes.
    pub size: u64,
    /// File type.
    pub kind: FileType,
    /// Unix permissions (always read-only).
    pub perm: u32,
    /// Last modification time.
    pub mtime: SystemTime,
    /// Last access time.
    pub atime: SystemTime,
    /// Creation time.
    pub ctime: SystemTime,
    /// Number of hard links.
    pub nlink: u32,
}

impl FileAttr {
    /// Attributes for a blob created at `created`.
    pub fn file(size: u64, created: SystemTime) -> Self {
        Self {
            size,
            kind: FileType::File,
            perm: FILE_PERM,
            mtime: created,
            atime: SystemTime::now(),
            ctime: created,
            nlink: 1,
        }
    }

    /// Attributes for a directory synthesized at `timestamp`.
    pub fn directory(timestamp: SystemTime) -> Self {
        Self {
            size: 0,
            kind: FileType::Directory,
            perm: DIR_PERM,
            mtime: timestamp,
            atime: timestamp,
            ctime: timestamp,
            nlink: 2, // . and ..
        }
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Entry attributes.
    pub attr: FileAttr,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<String>, attr: FileAttr) -> Self {
        Self {
            name: name.into(),
            attr,
        }
    }

    /// Entry type.
    pub fn kind(&self) -> FileType {
        self.attr.kind
    }
}

/// Attributes a host asked to change (always rejected).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetAttr {
    /// New size (truncate/extend).
    pub size: Option<u64>,
    /// New modification time.
    pub mtime: Option<SystemTime>,
    /// New access time.
    pub atime: Option<SystemTime>,
    /// New permissions.
    pub perm: Option<u32>,
}

/// Free-space report.
///
/// Synthesized from configuration plus the store's total data size; not a
/// precise accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSpace {
    /// Bytes available to the caller.
    pub available: u64,
    /// Total capacity in bytes.
    pub total: u64,
    /// Total free bytes.
    pub total_free: u64,
}

/// Open file flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenFlags {
    /// Write access requested.
    pub write: bool,
    /// Append mode.
    pub append: bool,
    /// Create if not exists.
    pub create: bool,
    /// Truncate on open.
    pub truncate: bool,
}

impl OpenFlags {
    /// Read-only access.
    pub fn read() -> Self {
        Self::default()
    }

    /// Write access.
    pub fn write() -> Self {
        Self {
            write: true,
            ..Default::default()
        }
    }

    /// Create with write access.
    pub fn create() -> Self {
        Self {
            write: true,
            create: true,
            ..Default::default()
        }
    }

    /// Returns true if any flag would modify the filesystem.
    pub fn wants_write(&self) -> bool {
        self.write || self.append || self.create || self.truncate
    }
}

/// An open file or directory.
///
/// The id is assigned by the boundary adapter; the namespace itself keeps
/// no per-handle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub id: u64,
    pub attr: FileAttr,
}

//! Filesystem boundary.
//!
//! This module is what a filesystem-driver host (FUSE, Dokan, an RPC
//! bridge) talks to. Key components:
//!
//! - [`VfsOps`] - Path-based filesystem operations trait
//! - [`BlobFs`] - Read-only implementation over a [`Namespace`]
//!
//! ## Design Decisions
//!
//! - **Path-based, no inodes**: Operations use paths, not inode numbers.
//!   Hosts handle inode ↔ path mapping locally.
//! - **Explicit offset/size**: Reads take offset and size, so no open
//!   handle is needed to read.
//! - **Read-only**: Every write-family operation returns
//!   [`VfsError::ReadOnly`] without touching the store.
//!
//! [`Namespace`]: crate::namespace::Namespace

mod blobfs;
mod error;
mod ops;
mod types;

pub use blobfs::BlobFs;
pub use error::{VfsError, VfsResult};
pub use ops::VfsOps;
pub use types::{
    DIR_PERM, DirEntry, FILE_PERM, FileAttr, FileHandle, FileType, FreeSpace, OpenFlags, SetAttr,
};

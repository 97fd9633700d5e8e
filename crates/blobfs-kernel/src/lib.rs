//! blobfs kernel: a flat blob store as a read-only hierarchical filesystem.
//!
//! Keys such as `root/uploads/2020/report.pdf` are stored flat. The
//! [`namespace`] module synthesizes directories from their common prefixes;
//! [`vfs`] presents the result to a filesystem-driver host; [`store`] holds
//! the store client interface and bundled clients.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use blobfs_kernel::{BlobFs, MemoryBlobStore, Namespace, PathNormalizer, VfsOps};
//!
//! let store = Arc::new(MemoryBlobStore::new());
//! store.put("root/uploads/2020/a.txt", b"hello world!".to_vec());
//!
//! let fs = BlobFs::new(Namespace::new(store, PathNormalizer::new("root", '/')), 0);
//! for entry in fs.readdir("/uploads").await? {
//!     println!("{} {:?}", entry.name, entry.kind());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod namespace;
pub mod store;
pub mod vfs;

pub use config::{BlobFsConfig, ConfigError, StoreBackend, StoreConfig};
pub use namespace::{
    BlobKey, DirectoryListing, KeyPattern, Namespace, NamespaceEntry, NamespaceError,
    NamespaceResult, PathNormalizer,
};
pub use store::{
    BlobMetadata, BlobStore, MemoryBlobStore, SqliteBlobStore, StoreError, StoreResult, StoreStats,
};
pub use vfs::{BlobFs, DirEntry, FileAttr, FileType, FreeSpace, OpenFlags, VfsError, VfsOps};

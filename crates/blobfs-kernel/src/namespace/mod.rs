//! Namespace resolution over a flat blob store.
//!
//! Directories are never stored. They are synthesized from the common
//! prefixes of existing keys at the moment a caller asks. Key components:
//!
//! - [`PathNormalizer`] - canonicalizes driver paths into [`BlobKey`]s
//! - [`QueryBuilder`] - exact / existence / children queries, always escaped
//! - [`Namespace::resolve`] - path to File, Directory or NotFound
//! - [`Namespace::list_children`] - deduplicated immediate children
//! - [`Namespace::read`] - offset reads through a scoped store stream
//!
//! ## Design Decisions
//!
//! - **Stateless**: a `Namespace` holds configuration and a shared store
//!   client, nothing else. Every call re-resolves against the store.
//! - **File wins**: if a blob exists at exactly the path, the path is a
//!   file and the directory probe is skipped.
//! - **No retries**: store faults surface as `StoreUnavailable`; retry
//!   policy belongs to the store client.

mod entry;
mod enumerate;
mod error;
mod path;
mod query;
mod read;
mod resolve;

use std::sync::Arc;

use crate::store::BlobStore;

pub use entry::{DirectoryListing, NamespaceEntry};
pub use error::{NamespaceError, NamespaceResult};
pub use path::{BlobKey, PathNormalizer};
pub use query::{KeyPattern, QueryBuilder};

/// The namespace resolution engine.
///
/// Cheap to clone; clones share the store client.
#[derive(Clone)]
pub struct Namespace {
    store: Arc<dyn BlobStore>,
    paths: PathNormalizer,
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("root", &self.paths.root())
            .field("separator", &self.paths.separator())
            .finish_non_exhaustive()
    }
}

impl Namespace {
    /// Create a namespace over `store`.
    pub fn new(store: Arc<dyn BlobStore>, paths: PathNormalizer) -> Self {
        Self { store, paths }
    }

    /// The path normalizer in use.
    pub fn paths(&self) -> &PathNormalizer {
        &self.paths
    }

    /// The underlying store client.
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Normalize a raw driver path into a store key.
    pub fn normalize(&self, raw: &str) -> BlobKey {
        self.paths.normalize(raw)
    }

    fn queries(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.paths)
    }
}

//! Path resolution.

use super::{BlobKey, Namespace, NamespaceEntry, NamespaceError, NamespaceResult};

impl Namespace {
    /// Resolve a raw driver path.
    ///
    /// Returns [`NamespaceError::NotFound`] when the path is neither a blob
    /// nor a prefix of one. Store faults are reported as
    /// [`NamespaceError::StoreUnavailable`], never as `NotFound`.
    pub async fn resolve(&self, path: &str) -> NamespaceResult<NamespaceEntry> {
        let key = self.normalize(path);
        self.resolve_key(&key).await
    }

    /// Resolve an already-normalized key.
    pub async fn resolve_key(&self, key: &BlobKey) -> NamespaceResult<NamespaceEntry> {
        if self.paths.is_root(key) {
            return Ok(NamespaceEntry::directory(self.paths.basename(key)));
        }

        let queries = self.queries();
        if let Some(meta) = self.store.find_exact(&queries.exact(key)).await? {
            tracing::trace!(key = %key, size = meta.size, "resolved file");
            return Ok(NamespaceEntry::File(meta));
        }

        let probe = queries.existence_under(key);
        if !self.store.find_by_pattern(&probe).await?.is_empty() {
            tracing::trace!(key = %key, "resolved synthesized directory");
            return Ok(NamespaceEntry::directory(self.paths.basename(key)));
        }

        Err(NamespaceError::not_found(key.as_str()))
    }
}

//! Blob reads.

use std::io::SeekFrom;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::{Namespace, NamespaceEntry, NamespaceError, NamespaceResult};
use crate::store::BlobMetadata;

impl Namespace {
    /// Read from the blob at `path` into `buf`, starting at `offset`.
    ///
    /// Returns the number of bytes read: `buf.len()` unless the blob ends
    /// first, and 0 at or past the end. Paths that are not blobs (including
    /// synthesized directories) are [`NamespaceError::NotFound`].
    pub async fn read(&self, path: &str, offset: u64, buf: &mut [u8]) -> NamespaceResult<usize> {
        let meta = self.resolve_blob(path).await?;
        self.read_blob(&meta, offset, buf).await
    }

    /// Read up to `len` bytes at `offset` into a new vector.
    ///
    /// The vector is sized to what the blob can supply, so `len` may be any
    /// capacity, `usize::MAX` included.
    pub async fn read_to_vec(&self, path: &str, offset: u64, len: usize) -> NamespaceResult<Vec<u8>> {
        let meta = self.resolve_blob(path).await?;
        let available = meta.size.saturating_sub(offset);
        let len = usize::try_from(available).map_or(len, |n| n.min(len));

        let mut buf = vec![0u8; len];
        let n = self.read_blob(&meta, offset, &mut buf).await?;
        buf.truncate(n);
        Ok(buf)
    }

    async fn resolve_blob(&self, path: &str) -> NamespaceResult<BlobMetadata> {
        let key = self.normalize(path);
        match self.resolve_key(&key).await? {
            NamespaceEntry::File(meta) => Ok(meta),
            NamespaceEntry::Directory { .. } => Err(NamespaceError::not_found(key.as_str())),
        }
    }

    /// Read from a blob the caller already resolved.
    ///
    /// The stream is opened, used and dropped within this call whatever the
    /// outcome.
    pub async fn read_blob(
        &self,
        meta: &BlobMetadata,
        offset: u64,
        buf: &mut [u8],
    ) -> NamespaceResult<usize> {
        let key = meta.key.as_str();
        if buf.is_empty() || offset >= meta.size {
            return Ok(0);
        }

        let mut stream = self
            .store
            .open_read_stream(&meta.key)
            .await
            .map_err(|e| NamespaceError::read_failure(key, e))?;

        stream
            .seek(SeekFrom::Start(offset))
            .await
            .map_err(|e| NamespaceError::read_failure(key, e))?;

        let mut filled = 0;
        while filled < buf.len() {
            let n = stream
                .read(&mut buf[filled..])
                .await
                .map_err(|e| NamespaceError::read_failure(key, e))?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        tracing::trace!(key, offset, bytes = filled, "read blob");
        Ok(filled)
    }
}

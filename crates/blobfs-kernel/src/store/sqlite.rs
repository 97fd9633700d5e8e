//! SQLite-backed blob store.
//!
//! One table, one row per blob. Pattern queries use `GLOB` (case-sensitive,
//! index-friendly for literal prefixes) and read streams use SQLite's
//! incremental blob I/O so large blobs are never loaded whole.

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection, DatabaseName, OptionalExtension, Row, params};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncRead, AsyncSeek, ReadBuf};

use super::{BlobMetadata, BlobReadStream, BlobStore, StoreError, StoreResult, StoreStats};
use crate::namespace::{BlobKey, KeyPattern};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS blobs (
    key TEXT PRIMARY KEY,
    size INTEGER NOT NULL,
    data BLOB NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch() * 1000)
);
"#;

const SELECT_META: &str = "SELECT key, size, created_at FROM blobs";

fn millis_to_time(millis: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(millis.max(0) as u64)
}

fn time_to_millis(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn row_to_metadata(row: &Row<'_>) -> rusqlite::Result<BlobMetadata> {
    Ok(BlobMetadata {
        key: BlobKey::from_raw(row.get::<_, String>(0)?),
        size: row.get::<_, i64>(1)? as u64,
        created: millis_to_time(row.get(2)?),
    })
}

/// Persistent blob store on a single SQLite database.
///
/// The connection is shared behind a mutex; read streams hold a handle to
/// the same connection and take the lock only for the duration of each
/// read.
#[derive(Debug, Clone)]
pub struct SqliteBlobStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBlobStore {
    /// Open or create a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Store `data` under `key`, replacing any existing blob.
    ///
    /// This is the store's own loading API; the filesystem never calls it.
    pub fn put(&self, key: &str, data: &[u8]) -> StoreResult<BlobMetadata> {
        self.put_at(key, data, SystemTime::now())
    }

    /// Store `data` under `key` with an explicit upload time.
    pub fn put_at(&self, key: &str, data: &[u8], created: SystemTime) -> StoreResult<BlobMetadata> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO blobs (key, size, data, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![key, data.len() as i64, data, time_to_millis(created)],
        )?;
        Ok(BlobMetadata {
            key: BlobKey::from_raw(key),
            size: data.len() as u64,
            created: millis_to_time(time_to_millis(created)),
        })
    }
}

#[async_trait]
impl BlobStore for SqliteBlobStore {
    async fn find_exact(&self, key: &BlobKey) -> StoreResult<Option<BlobMetadata>> {
        let conn = self.conn.lock();
        let meta = conn
            .query_row(
                &format!("{SELECT_META} WHERE key = ?1"),
                params![key.as_str()],
                row_to_metadata,
            )
            .optional()?;
        Ok(meta)
    }

    async fn find_by_pattern(&self, pattern: &KeyPattern) -> StoreResult<Vec<BlobMetadata>> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = pattern.limit().map(|n| n as i64).unwrap_or(-1);

        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare(&format!("{SELECT_META} WHERE key GLOB ?1 ORDER BY key LIMIT ?2"))?;
        let rows = stmt.query_map(params![pattern.to_glob(), limit], row_to_metadata)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn open_read_stream(&self, key: &BlobKey) -> StoreResult<Box<dyn BlobReadStream>> {
        let (rowid, len) = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT rowid, size FROM blobs WHERE key = ?1",
                params![key.as_str()],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)? as u64)),
            )
            .optional()?
            .ok_or_else(|| StoreError::blob_missing(key.as_str()))?
        };
        Ok(Box::new(SqliteReadStream {
            conn: Arc::clone(&self.conn),
            rowid,
            len,
            pos: 0,
        }))
    }

    async fn store_stats(&self) -> StoreResult<StoreStats> {
        let conn = self.conn.lock();
        let (count, total) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(size), 0) FROM blobs",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;
        Ok(StoreStats {
            blob_count: count as u64,
            total_size: total as u64,
        })
    }
}

/// Seekable stream over one row's `data` column.
///
/// Each read opens a short-lived incremental blob handle at the current
/// position. If the row is replaced after the stream was opened, the next
/// read fails rather than returning another blob's bytes.
struct SqliteReadStream {
    conn: Arc<Mutex<Connection>>,
    rowid: i64,
    len: u64,
    pos: u64,
}

impl SqliteReadStream {
    fn read_at_pos(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.len || dst.is_empty() {
            return Ok(0);
        }
        let conn = self.conn.lock();
        let mut blob = conn
            .blob_open(DatabaseName::Main, "blobs", "data", self.rowid, true)
            .map_err(io::Error::other)?;
        blob.seek(SeekFrom::Start(self.pos))?;
        let n = blob.read(dst)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl AsyncRead for SqliteReadStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let dst = buf.initialize_unfilled();
        let n = this.read_at_pos(dst)?;
        buf.advance(n);
        Poll::Ready(Ok(()))
    }
}

impl AsyncSeek for SqliteReadStream {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
        let this = self.get_mut();
        let next = match position {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::End(delta) => this.len.checked_add_signed(delta),
            SeekFrom::Current(delta) => this.pos.checked_add_signed(delta),
        };
        this.pos = next.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek to a negative position")
        })?;
        Ok(())
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Poll::Ready(Ok(self.pos))
    }
}

//! Resolved namespace entries.

use serde::Serialize;
use std::time::SystemTime;

use crate::store::BlobMetadata;

/// What a path resolves to.
///
/// Directories have no backing record in the store; their timestamp is the
/// moment they were synthesized and their length is always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NamespaceEntry {
    /// A blob stored under exactly this key.
    File(BlobMetadata),
    /// A directory inferred from keys sharing this path as a prefix.
    Directory { name: String, timestamp: SystemTime },
}

impl NamespaceEntry {
    /// Synthesize a directory entry stamped with the current time.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::Directory {
            name: name.into(),
            timestamp: SystemTime::now(),
        }
    }

    /// Entry name: the last key segment for files, the directory name otherwise.
    pub fn name(&self, separator: char) -> &str {
        match self {
            Self::File(meta) => meta.name(separator),
            Self::Directory { name, .. } => name,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// Length in bytes; zero for directories.
    pub fn size(&self) -> u64 {
        match self {
            Self::File(meta) => meta.size,
            Self::Directory { .. } => 0,
        }
    }

    /// Creation time for files, synthesis time for directories.
    pub fn timestamp(&self) -> SystemTime {
        match self {
            Self::File(meta) => meta.created,
            Self::Directory { timestamp, .. } => *timestamp,
        }
    }
}

/// Immediate children of a directory, one entry per distinct child.
pub type DirectoryListing = Vec<NamespaceEntry>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::BlobKey;

    #[test]
    fn test_file_entry() {
        let entry = NamespaceEntry::File(BlobMetadata {
            key: BlobKey::from_raw("root/uploads/a.txt"),
            size: 12,
            created: SystemTime::UNIX_EPOCH,
        });
        assert!(entry.is_file());
        assert_eq!(entry.name('/'), "a.txt");
        assert_eq!(entry.size(), 12);
        assert_eq!(entry.timestamp(), SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn test_directory_entry() {
        let before = SystemTime::now();
        let entry = NamespaceEntry::directory("2020");
        assert!(entry.is_dir());
        assert_eq!(entry.name('/'), "2020");
        assert_eq!(entry.size(), 0);
        assert!(entry.timestamp() >= before);
    }
}

//! VFS error types.

use std::io;
use thiserror::Error;

use crate::namespace::NamespaceError;

/// VFS error type.
#[derive(Debug, Error)]
pub enum VfsError {
    /// File or directory not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem is read-only.
    #[error("read-only filesystem: {0} is not supported")]
    ReadOnly(&'static str),

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Expected a file.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// Store or stream fault.
    #[error("I/O error: {0}")]
    Io(#[source] NamespaceError),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(path: impl Into<String>) -> Self {
        Self::IsADirectory(path.into())
    }
}

impl From<NamespaceError> for VfsError {
    fn from(e: NamespaceError) -> Self {
        match e {
            NamespaceError::NotFound(path) => Self::NotFound(path),
            NamespaceError::Unsupported(op) => Self::ReadOnly(op),
            other => Self::Io(other),
        }
    }
}

/// Convert VfsError to std::io::Error for hosts speaking std I/O.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            VfsError::ReadOnly(op) => io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read-only filesystem: {op}"),
            ),
            VfsError::NotADirectory(msg) => io::Error::new(io::ErrorKind::NotADirectory, msg),
            VfsError::IsADirectory(msg) => io::Error::new(io::ErrorKind::IsADirectory, msg),
            VfsError::Io(NamespaceError::ReadFailure { source, .. }) => source,
            VfsError::Io(other) => io::Error::other(other),
        }
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_namespace_mapping() {
        assert!(matches!(
            VfsError::from(NamespaceError::not_found("a")),
            VfsError::NotFound(_)
        ));
        assert!(matches!(
            VfsError::from(NamespaceError::Unsupported("write")),
            VfsError::ReadOnly("write")
        ));
        assert!(matches!(
            VfsError::from(NamespaceError::StoreUnavailable(StoreError::unavailable("down"))),
            VfsError::Io(_)
        ));
    }

    #[test]
    fn test_io_kinds() {
        let kind = |e: VfsError| io::Error::from(e).kind();
        assert_eq!(kind(VfsError::not_found("a")), io::ErrorKind::NotFound);
        assert_eq!(kind(VfsError::ReadOnly("mkdir")), io::ErrorKind::PermissionDenied);
        assert_eq!(kind(VfsError::not_a_directory("a")), io::ErrorKind::NotADirectory);
        assert_eq!(
            kind(VfsError::Io(NamespaceError::StoreUnavailable(StoreError::unavailable(
                "down"
            )))),
            io::ErrorKind::Other
        );
        let broken = NamespaceError::read_failure(
            "k",
            io::Error::new(io::ErrorKind::UnexpectedEof, "short"),
        );
        assert_eq!(kind(VfsError::Io(broken)), io::ErrorKind::UnexpectedEof);
    }
}

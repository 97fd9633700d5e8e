//! Path normalization into the store key namespace.
//!
//! Driver paths arrive with whatever separator the host protocol uses
//! (`/` on FUSE-style hosts, `\` on Windows-style hosts). Every path is
//! rewritten into a single canonical form before it touches the store, so
//! two spellings of the same location always produce the same key.
//!
//! Only the driver separator and the canonical key separator split a path.
//! Any other character, including the separator of some other host, is
//! part of a segment: under a `/` host, `a\b.txt` is one file name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized key in the flat store.
///
/// Uses the canonical separator only and never ends with a separator,
/// except for an empty root key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobKey(String);

impl BlobKey {
    /// Wrap a key exactly as the store reported it.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty key (root of an unprefixed namespace).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the key, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlobKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes raw driver paths into [`BlobKey`]s under a configured root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNormalizer {
    root: String,
    separator: char,
    driver_separator: char,
}

impl PathNormalizer {
    /// Create a normalizer rooted at `root`.
    ///
    /// The root is itself cleaned: empty segments and stray separators are
    /// dropped, so `"/root/"` and `"root"` are the same root. Driver paths
    /// are expected to use `/`; see [`with_driver_separator`].
    ///
    /// [`with_driver_separator`]: Self::with_driver_separator
    pub fn new(root: &str, separator: char) -> Self {
        let sep = separator.to_string();
        let root = root
            .split(separator)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(&sep);
        Self {
            root,
            separator,
            driver_separator: '/',
        }
    }

    /// Use `separator` as the driver path separator (`\` for Dokan-style hosts).
    pub fn with_driver_separator(mut self, separator: char) -> Self {
        self.driver_separator = separator;
        self
    }

    /// The canonical separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// The separator driver paths use.
    pub fn driver_separator(&self) -> char {
        self.driver_separator
    }

    /// The key every root path normalizes to.
    pub fn root(&self) -> BlobKey {
        BlobKey(self.root.clone())
    }

    /// Returns true if `key` is the namespace root.
    pub fn is_root(&self, key: &BlobKey) -> bool {
        key.as_str() == self.root
    }

    /// Normalize a raw driver path.
    ///
    /// The driver separator and the canonical separator split segments. No
    /// stored key has a segment containing the canonical separator, so it
    /// can only mean a boundary. Empty and `.` segments are dropped; `..`
    /// pops a segment but never climbs above the root.
    pub fn normalize(&self, raw: &str) -> BlobKey {
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split(|c| c == self.driver_separator || c == self.separator) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
        self.join(&segments)
    }

    fn join(&self, segments: &[&str]) -> BlobKey {
        let sep = self.separator.to_string();
        if segments.is_empty() {
            return self.root();
        }
        let tail = segments.join(&sep);
        if self.root.is_empty() {
            BlobKey(tail)
        } else {
            BlobKey(format!("{}{}{}", self.root, sep, tail))
        }
    }

    /// The literal prefix shared by every key beneath `key`.
    ///
    /// Empty for an empty root, otherwise `key` followed by the separator.
    pub fn child_prefix(&self, key: &BlobKey) -> String {
        if key.is_empty() {
            String::new()
        } else {
            format!("{}{}", key.as_str(), self.separator)
        }
    }

    /// Last segment of a key. The root's basename is the root key itself.
    pub fn basename<'a>(&self, key: &'a BlobKey) -> &'a str {
        key.as_str()
            .rsplit(self.separator)
            .next()
            .unwrap_or(key.as_str())
    }
}

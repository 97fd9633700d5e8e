//! Query shapes issued against the flat store.
//!
//! Three shapes cover everything the namespace needs:
//!
//! - **Exact**: `key == P`, answered by [`BlobStore::find_exact`].
//! - **Existence under prefix**: any key starting with `P + sep` (limit 1).
//! - **Immediate children**: all keys starting with `P + sep` with a
//!   non-empty remainder.
//!
//! The prefix is always a literal. Stores never see raw path text spliced
//! into their pattern syntax; they render a [`KeyPattern`] through one of
//! the escaping renderers below.
//!
//! [`BlobStore::find_exact`]: crate::store::BlobStore::find_exact

use super::path::{BlobKey, PathNormalizer};

/// A literal-prefix pattern over store keys.
///
/// Matches every key that starts with `prefix` and has at least one more
/// character after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    prefix: String,
    limit: Option<usize>,
}

impl KeyPattern {
    /// Match all keys under a literal prefix.
    pub fn under(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            limit: None,
        }
    }

    /// Cap the number of results the store should return.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The literal prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Result cap, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// The part of `key` after the prefix, if `key` matches.
    pub fn remainder<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix.as_str())
            .filter(|rest| !rest.is_empty())
    }

    /// Returns true if `key` matches this pattern.
    pub fn matches(&self, key: &str) -> bool {
        self.remainder(key).is_some()
    }

    /// Anchored regular expression equivalent to this pattern.
    ///
    /// Every regex metacharacter in the prefix is escaped.
    pub fn to_regex(&self) -> String {
        format!(r"(?s)\A{}.+\z", regex::escape(&self.prefix))
    }

    /// SQLite `GLOB` expression equivalent to this pattern.
    ///
    /// `GLOB` has no escape character; `*`, `?` and `[` are made literal by
    /// wrapping them in a one-character class.
    pub fn to_glob(&self) -> String {
        let mut out = String::with_capacity(self.prefix.len() + 2);
        for c in self.prefix.chars() {
            match c {
                '*' | '?' | '[' => {
                    out.push('[');
                    out.push(c);
                    out.push(']');
                }
                _ => out.push(c),
            }
        }
        out.push_str("?*");
        out
    }
}

/// Builds the three query shapes for normalized keys.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    paths: &'a PathNormalizer,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(paths: &'a PathNormalizer) -> Self {
        Self { paths }
    }

    /// Exact-key lookup.
    pub fn exact(&self, key: &BlobKey) -> BlobKey {
        key.clone()
    }

    /// Probe for any key beneath `key`.
    pub fn existence_under(&self, key: &BlobKey) -> KeyPattern {
        KeyPattern::under(self.paths.child_prefix(key)).with_limit(1)
    }

    /// Every key beneath `key`; callers split the remainder themselves.
    pub fn immediate_children(&self, key: &BlobKey) -> KeyPattern {
        KeyPattern::under(self.paths.child_prefix(key))
    }
}

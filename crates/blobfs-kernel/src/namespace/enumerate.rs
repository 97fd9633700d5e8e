//! Directory enumeration.

use std::collections::BTreeSet;

use super::{DirectoryListing, Namespace, NamespaceEntry, NamespaceResult};

impl Namespace {
    /// Immediate children of a directory path.
    ///
    /// Blobs directly inside the directory are reported as files. Deeper
    /// keys contribute their first segment below the directory as a
    /// synthesized sub-directory, once per distinct name. Every reported
    /// name resolves through [`Namespace::resolve`] to the same kind. A prefix with no
    /// keys yields an empty listing; callers that need to distinguish a
    /// missing directory resolve the path first.
    ///
    /// Entries are sorted by name.
    pub async fn list_children(&self, path: &str) -> NamespaceResult<DirectoryListing> {
        let key = self.normalize(path);
        let pattern = self.queries().immediate_children(&key);
        let separator = self.paths.separator();

        let mut files = Vec::new();
        let mut dirs = BTreeSet::new();
        for meta in self.store.find_by_pattern(&pattern).await? {
            let Some(rest) = pattern.remainder(meta.key.as_str()) else {
                continue;
            };
            match rest.split_once(separator) {
                None => files.push(NamespaceEntry::File(meta)),
                Some((first, tail)) if !first.is_empty() && !tail.is_empty() => {
                    if !dirs.contains(first) {
                        dirs.insert(first.to_string());
                    }
                }
                // "dir//x" has no nameable child here, and "dir/x/" has no
                // key beneath "dir/x/" for the resolver to find.
                Some(_) => {}
            }
        }

        tracing::debug!(
            key = %key,
            files = files.len(),
            dirs = dirs.len(),
            "listed children"
        );

        let mut listing: DirectoryListing = files;
        listing.extend(dirs.into_iter().map(NamespaceEntry::directory));
        listing.sort_by(|a, b| a.name(separator).cmp(b.name(separator)));
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::PathNormalizer;
    use crate::store::MemoryBlobStore;
    use std::sync::Arc;

    fn namespace(keys: &[&str]) -> Namespace {
        let store = Arc::new(MemoryBlobStore::new());
        for key in keys {
            store.put(*key, b"data".to_vec());
        }
        Namespace::new(store, PathNormalizer::new("root", '/'))
    }

    fn summary(listing: &DirectoryListing) -> Vec<(String, bool)> {
        listing
            .iter()
            .map(|e| (e.name('/').to_string(), e.is_dir()))
            .collect()
    }

    #[tokio::test]
    async fn test_directories_collapse() {
        let ns = namespace(&["root/p/a/x", "root/p/a/y", "root/p/b"]);
        let listing = ns.list_children("/p").await.unwrap();
        assert_eq!(
            summary(&listing),
            vec![("a".to_string(), true), ("b".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_root_listing() {
        let ns = namespace(&["root/uploads/2020/a.txt", "root/top.txt", "other/x"]);
        let listing = ns.list_children("/").await.unwrap();
        assert_eq!(
            summary(&listing),
            vec![("top.txt".to_string(), false), ("uploads".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn test_empty_prefix_is_empty_listing() {
        let ns = namespace(&["root/a"]);
        assert!(ns.list_children("/missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sibling_prefix_not_included() {
        let ns = namespace(&["root/p/a", "root/pp/b", "root/p.x/c"]);
        let listing = ns.list_children("/p").await.unwrap();
        assert_eq!(summary(&listing), vec![("a".to_string(), false)]);
    }

    #[tokio::test]
    async fn test_file_and_directory_share_name() {
        let ns = namespace(&["root/p/a", "root/p/a/b"]);
        let listing = ns.list_children("/p").await.unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.iter().filter(|e| e.is_dir()).count(), 1);
        assert_eq!(listing.iter().filter(|e| e.is_file()).count(), 1);
    }

    #[tokio::test]
    async fn test_trailing_separator_key_skipped() {
        let ns = namespace(&["root/p/x/", "root/p/y"]);
        let listing = ns.list_children("/p").await.unwrap();
        assert_eq!(summary(&listing), vec![("y".to_string(), false)]);
        assert!(ns.resolve("/p/x").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_listed_directories_resolve() {
        let ns = namespace(&["root/p/x/", "root/p/a//b", "root/p/c/d/", "root/p/c/e"]);
        let listing = ns.list_children("/p").await.unwrap();
        assert_eq!(
            summary(&listing),
            vec![("a".to_string(), true), ("c".to_string(), true)]
        );
        for entry in &listing {
            let resolved = ns.resolve(&format!("/p/{}", entry.name('/'))).await.unwrap();
            assert!(resolved.is_dir());
        }
    }

    #[tokio::test]
    async fn test_empty_segment_skipped() {
        let ns = namespace(&["root/p//x", "root/p/y"]);
        let listing = ns.list_children("/p").await.unwrap();
        assert_eq!(summary(&listing), vec![("y".to_string(), false)]);
    }
}

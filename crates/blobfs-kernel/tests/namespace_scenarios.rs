//! End-to-end namespace scenarios, run against every bundled store client.

use std::collections::BTreeSet;
use std::sync::Arc;

use blobfs_kernel::vfs::FileType;
use blobfs_kernel::{
    BlobFs, BlobStore, MemoryBlobStore, Namespace, NamespaceEntry, NamespaceError,
    PathNormalizer, SqliteBlobStore, VfsError, VfsOps,
};

/// Build one namespace per store client, each loaded with `blobs`.
fn namespaces(root: &str, blobs: &[(&str, &[u8])]) -> Vec<(&'static str, Namespace)> {
    let memory = MemoryBlobStore::new();
    let sqlite = SqliteBlobStore::in_memory().expect("open sqlite");
    for (key, data) in blobs {
        memory.put(*key, data.to_vec());
        sqlite.put(key, data).expect("sqlite put");
    }

    let stores: Vec<(&'static str, Arc<dyn BlobStore>)> =
        vec![("memory", Arc::new(memory)), ("sqlite", Arc::new(sqlite))];
    stores
        .into_iter()
        .map(|(name, store)| (name, Namespace::new(store, PathNormalizer::new(root, '/'))))
        .collect()
}

/// Order-insensitive view of a listing: (name, is_dir, size).
fn shape(listing: &[NamespaceEntry]) -> BTreeSet<(String, bool, u64)> {
    listing
        .iter()
        .map(|e| (e.name('/').to_string(), e.is_dir(), e.size()))
        .collect()
}

fn uploads() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("root/uploads/2020/a.txt", b"twelve bytes".as_slice()),
        ("root/uploads/2021/b.txt", b"hello".as_slice()),
    ]
}

#[tokio::test]
async fn uploads_scenario() {
    // Unprefixed namespace, so driver paths are the store keys verbatim.
    for (store, ns) in namespaces("", &uploads()) {
        let listing = ns.list_children("root/uploads").await.unwrap();
        assert_eq!(
            shape(&listing),
            BTreeSet::from([
                ("2020".to_string(), true, 0),
                ("2021".to_string(), true, 0),
            ]),
            "{store}"
        );

        assert!(ns.resolve("root/uploads/2020").await.unwrap().is_dir(), "{store}");

        let mut buf = [0u8; 10];
        let n = ns.read("root/uploads/2021/b.txt", 2, &mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"llo", "{store}");
    }
}

#[tokio::test]
async fn uploads_scenario_under_configured_root() {
    for (store, ns) in namespaces("root", &uploads()) {
        let listing = ns.list_children("/uploads").await.unwrap();
        assert_eq!(listing.len(), 2, "{store}");
        let NamespaceEntry::File(meta) = ns.resolve("/uploads/2020/a.txt").await.unwrap() else {
            panic!("{store}: expected a file");
        };
        assert_eq!(meta.size, 12, "{store}");
    }
}

#[tokio::test]
async fn backslash_driver_paths() {
    for (store, ns) in namespaces("root", &uploads()) {
        let ns = Namespace::new(
            Arc::clone(ns.store()),
            PathNormalizer::new("root", '/').with_driver_separator('\\'),
        );
        let listing = ns.list_children("\\uploads").await.unwrap();
        assert_eq!(listing.len(), 2, "{store}");
        let NamespaceEntry::File(meta) = ns.resolve("\\uploads\\2020\\a.txt").await.unwrap() else {
            panic!("{store}: expected a file");
        };
        assert_eq!(meta.size, 12, "{store}");
    }
}

#[tokio::test]
async fn listed_names_resolve_to_their_own_blob() {
    let blobs: &[(&str, &[u8])] = &[
        ("root/docs/a\\b.txt", b"secret".as_slice()),
        ("root/docs/a/b.txt", b"other!!".as_slice()),
    ];
    for (store, ns) in namespaces("root", blobs) {
        let listing = ns.list_children("/docs").await.unwrap();
        assert_eq!(
            shape(&listing),
            BTreeSet::from([("a".to_string(), true, 0), ("a\\b.txt".to_string(), false, 6)]),
            "{store}"
        );

        let fs = BlobFs::new(ns.clone(), 0);
        let entries = fs.readdir("/docs").await.unwrap();
        for entry in entries.iter().filter(|e| e.kind() == FileType::File) {
            let path = format!("/docs/{}", entry.name);
            let attr = fs.getattr(&path).await.unwrap();
            assert_eq!(attr.size, entry.attr.size, "{store}: {path}");
        }
        assert_eq!(fs.read_all("/docs/a\\b.txt").await.unwrap(), b"secret", "{store}");
        assert_eq!(fs.read_all("/docs/a/b.txt").await.unwrap(), b"other!!", "{store}");
    }
}

#[tokio::test]
async fn child_blob_makes_parent_a_directory() {
    for (store, ns) in namespaces("", &[("p/q/c", b"data".as_slice())]) {
        let parent = ns.resolve("p/q").await.unwrap();
        assert!(parent.is_dir(), "{store}");
        assert!(!parent.is_file(), "{store}");
        assert!(ns.resolve("p/q/c").await.unwrap().is_file(), "{store}");
    }
}

#[tokio::test]
async fn shared_subdirectory_appears_once() {
    let blobs: &[(&str, &[u8])] = &[
        ("P/a/x", b"1".as_slice()),
        ("P/a/y", b"2".as_slice()),
        ("P/b", b"3".as_slice()),
    ];
    for (store, ns) in namespaces("", blobs) {
        let listing = ns.list_children("P").await.unwrap();
        assert_eq!(listing.len(), 2, "{store}");
        assert_eq!(
            shape(&listing),
            BTreeSet::from([("a".to_string(), true, 0), ("b".to_string(), false, 1)]),
            "{store}"
        );
    }
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    for (store, ns) in namespaces("root", &uploads()) {
        let err = ns.resolve("/uploads/2022").await.unwrap_err();
        assert!(matches!(err, NamespaceError::NotFound(_)), "{store}");
    }
}

#[tokio::test]
async fn reads_at_and_past_end_are_empty() {
    for (store, ns) in namespaces("root", &uploads()) {
        for offset in [5, 6, 4096] {
            let data = ns.read_to_vec("/uploads/2021/b.txt", offset, 16).await.unwrap();
            assert!(data.is_empty(), "{store} offset {offset}");
        }
    }
}

#[tokio::test]
async fn full_read_is_byte_exact() {
    let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    for (store, ns) in namespaces("", &[("bin/blob", payload.as_slice())]) {
        let data = ns.read_to_vec("bin/blob", 0, 20_000).await.unwrap();
        assert_eq!(data, payload, "{store}");
    }
}

#[tokio::test]
async fn resolution_is_idempotent() {
    for (store, ns) in namespaces("root", &uploads()) {
        let first = shape(&ns.list_children("/uploads").await.unwrap());
        let second = shape(&ns.list_children("/uploads").await.unwrap());
        assert_eq!(first, second, "{store}");

        let a = ns.resolve("/uploads/2020/a.txt").await.unwrap();
        let b = ns.resolve("/uploads/2020/a.txt").await.unwrap();
        assert_eq!(a, b, "{store}");
    }
}

#[tokio::test]
async fn pattern_characters_are_literal_in_every_query() {
    let blobs: &[(&str, &[u8])] = &[
        ("r/a.c/file", b"1".as_slice()),
        ("r/abc/file", b"2".as_slice()),
        ("r/x*/file", b"3".as_slice()),
        ("r/xy/file", b"4".as_slice()),
        ("r/[q]/file", b"5".as_slice()),
        ("r/q/file", b"6".as_slice()),
        ("r/m_n/file", b"7".as_slice()),
        ("r/m%n/file", b"8".as_slice()),
    ];
    for (store, ns) in namespaces("", blobs) {
        // Exact + existence probe
        assert!(ns.resolve("r/a.c").await.unwrap().is_dir(), "{store}");
        assert!(ns.resolve("r/a.").await.unwrap_err().is_not_found(), "{store}");
        assert!(ns.resolve("r/x*").await.unwrap().is_dir(), "{store}");
        assert!(ns.resolve("r/x?").await.unwrap_err().is_not_found(), "{store}");
        assert!(ns.resolve("r/[a-z]").await.unwrap_err().is_not_found(), "{store}");
        assert!(ns.resolve("r/.*").await.unwrap_err().is_not_found(), "{store}");
        assert!(ns.resolve("r/m%").await.unwrap_err().is_not_found(), "{store}");

        // Immediate children
        for (dir, only) in [
            ("r/a.c", "file"),
            ("r/x*", "file"),
            ("r/[q]", "file"),
            ("r/m_n", "file"),
        ] {
            let listing = ns.list_children(dir).await.unwrap();
            assert_eq!(listing.len(), 1, "{store}: {dir}");
            assert_eq!(listing[0].name('/'), only, "{store}: {dir}");
        }
        assert!(ns.list_children("r/.*").await.unwrap().is_empty(), "{store}");
        assert!(ns.list_children("r/x?").await.unwrap().is_empty(), "{store}");
    }
}

#[tokio::test]
async fn filesystem_boundary_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteBlobStore::open(dir.path().join("blobs.db")).unwrap();
    for (key, data) in uploads() {
        store.put(key, data).unwrap();
    }
    let fs = BlobFs::new(
        Namespace::new(Arc::new(store), PathNormalizer::new("root", '/')),
        1 << 20,
    );

    let root = fs.readdir("/").await.unwrap();
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].name, "uploads");
    assert_eq!(root[0].kind(), FileType::Directory);

    let year = fs.readdir("/uploads/2020").await.unwrap();
    assert_eq!(year.len(), 1);
    assert_eq!(year[0].attr.size, 12);

    assert_eq!(fs.read("/uploads/2021/b.txt", 2, 10).await.unwrap(), b"llo");
    assert!(matches!(
        fs.create("/uploads/new.txt", 0o644).await,
        Err(VfsError::ReadOnly(_))
    ));

    let space = fs.free_space().await.unwrap();
    assert_eq!(space.total, (1 << 20) + 17);
}

#[tokio::test]
async fn concurrent_callers_share_one_namespace() {
    let (_, ns) = namespaces("root", &uploads()).remove(1);
    let ns = Arc::new(ns);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let ns = Arc::clone(&ns);
            tokio::spawn(async move {
                if i % 2 == 0 {
                    ns.list_children("/uploads").await.map(|l| l.len())
                } else {
                    ns.read_to_vec("/uploads/2020/a.txt", 0, 64).await.map(|d| d.len())
                }
            })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let n = task.await.unwrap().unwrap();
        assert_eq!(n, if i % 2 == 0 { 2 } else { 12 });
    }
}

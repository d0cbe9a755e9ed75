//! Prompt store integration tests.
//!
//! Covers startup recovery from a populated directory and concurrent access
//! from several threads.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::uninlined_format_args)]

use prompter::storage::prompt::FilesystemPromptStorage;
use prompter::{Error, PromptQuery, PromptRecord, PromptStorage};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

/// Names of visible files in a directory.
fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| !name.starts_with('.'))
        .collect()
}

mod recovery {
    use super::*;

    #[test]
    fn test_loads_good_files_and_skips_bad_ones() {
        let dir = TempDir::new().unwrap();
        for i in 0..5 {
            fs::write(
                dir.path().join(format!("good-{i}.md")),
                format!("---\nname: good-{i}\ntitle: Good {i}\n---\nbody {i}\n"),
            )
            .unwrap();
        }
        fs::write(dir.path().join("bad-1.md"), "no front matter").unwrap();
        fs::write(dir.path().join("bad-2.md"), "---\nname: unterminated\n").unwrap();
        fs::write(dir.path().join("bad-3.md"), "---\ntitle: nameless\n---\nbody").unwrap();

        let store = FilesystemPromptStorage::open(dir.path()).unwrap();
        let records = store.list(&PromptQuery::all()).unwrap();

        assert_eq!(records.len(), 5);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.name, format!("good-{i}"));
            assert_eq!(record.content, format!("body {i}"));
        }
    }

    #[test]
    fn test_written_files_survive_restart() {
        let dir = TempDir::new().unwrap();
        let original = PromptRecord::new("persist", "Line one\nLine two")
            .with_title("Persisted")
            .with_description("Survives a restart")
            .with_arguments(["x", "y"])
            .with_tags(["a", "b"]);

        {
            let store = FilesystemPromptStorage::open(dir.path()).unwrap();
            store.create(original.clone()).unwrap();
        }

        let store = FilesystemPromptStorage::open(dir.path()).unwrap();
        assert_eq!(store.read("persist").unwrap(), original);
        assert_eq!(file_names(dir.path()), BTreeSet::from(["persist.md".to_string()]));
    }

    #[test]
    fn test_unreadable_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            FilesystemPromptStorage::open(&file),
            Err(Error::OperationFailed { .. })
        ));
    }
}

mod concurrency {
    use super::*;

    const THREADS: usize = 8;
    const PER_THREAD: usize = 10;

    #[test]
    fn test_concurrent_creates_keep_cache_and_files_paired() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FilesystemPromptStorage::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        let name = format!("t{t}-p{i}");
                        store
                            .create(PromptRecord::new(&name, format!("content {t} {i}")))
                            .unwrap();
                        assert!(store.read(&name).is_ok());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let cached: BTreeSet<String> = store
            .list(&PromptQuery::all())
            .unwrap()
            .into_iter()
            .map(|r| format!("{}.md", r.id))
            .collect();
        assert_eq!(cached.len(), THREADS * PER_THREAD);
        assert_eq!(cached, file_names(dir.path()));
    }

    #[test]
    fn test_concurrent_writers_on_one_name() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FilesystemPromptStorage::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        store
                            .update(PromptRecord::new("shared", format!("writer {t} round {i}")))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let cached = store.read("shared").unwrap();
        drop(store);

        let reopened = FilesystemPromptStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.read("shared").unwrap(), cached);
        assert_eq!(file_names(dir.path()), BTreeSet::from(["shared.md".to_string()]));
    }

    #[test]
    fn test_readers_see_whole_records_during_writes() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FilesystemPromptStorage::open(dir.path()).unwrap());
        store
            .create(PromptRecord::new("pair", "0").with_title("0"))
            .unwrap();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 1..=50 {
                    let v = i.to_string();
                    store
                        .update(PromptRecord::new("pair", v.clone()).with_title(v))
                        .unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let record = store.read("pair").unwrap();
                        assert_eq!(record.title, record.content);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn test_create_and_delete_interleaved() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FilesystemPromptStorage::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        let name = format!("tmp-{t}-{i}");
                        store.create(PromptRecord::new(&name, "x")).unwrap();
                        if i % 2 == 0 {
                            store.delete(&name).unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let remaining = store.list(&PromptQuery::all()).unwrap();
        assert_eq!(remaining.len(), THREADS * PER_THREAD / 2);
        assert_eq!(file_names(dir.path()).len(), remaining.len());
    }
}

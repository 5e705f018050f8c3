//! # Copy Engine
//!
//! Replicates a file or directory subtree from one store into another so
//! that relative structure under the destination mirrors relative
//! structure under the source.
//!
//! ## Design
//!
//! - One walker, polymorphic over two [`FileStore`] handles; the engine
//!   never branches on which concrete backends it holds, so every copy
//!   direction shares one code path and one failure contract
//! - Directory copies never merge into a populated destination
//! - Fail fast, no rollback: the first failed transfer aborts the
//!   remaining traversal and the destination may be left partial, for
//!   the operator to inspect and re-run

use fs_path::{suffix_of, PathError, PathResolver};
use fs_store::{FileStore, StoreError};
use thiserror::Error;

/// Errors that can abort a copy
#[derive(Debug, Error)]
pub enum CopyError {
    /// The source path names nothing
    #[error("The source '{0}' does not exist")]
    SourceMissing(String),

    /// The destination directory exists and has children
    #[error("Destination folder '{0}' is not empty")]
    DestinationNotEmpty(String),

    /// One file transfer failed; the traversal stops here
    #[error("Copy failed at '{path}': {source}")]
    FileTransfer {
        /// Source path of the failed transfer
        path: String,
        /// The backend failure
        #[source]
        source: StoreError,
    },

    /// Suffix or path arithmetic failed
    #[error(transparent)]
    Path(#[from] PathError),

    /// A backend query failed outside a file transfer
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Summary of a finished copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Number of files written to the destination
    pub files_copied: usize,
    /// Number of directories created on the destination
    pub dirs_created: usize,
}

/// Copies a file or directory subtree between two stores
///
/// The source must exist. A single file is transferred directly; if the
/// destination names an existing directory the file lands inside it
/// under the source's base name. A directory copy refuses a populated
/// destination directory before writing anything, then walks the source
/// depth-first pre-order, creating each destination directory before
/// descending into it. Child order is whatever the source backend's
/// listing returns.
pub fn copy_tree<S, D>(
    source: &mut S,
    dest: &mut D,
    source_root: &str,
    dest_root: &str,
) -> Result<CopyOutcome, CopyError>
where
    S: FileStore + ?Sized,
    D: FileStore + ?Sized,
{
    let source_root = PathResolver::remove_trailing_slash(source_root);
    let dest_root = PathResolver::remove_trailing_slash(dest_root);

    if !source.exists(source_root)? {
        return Err(CopyError::SourceMissing(source_root.to_string()));
    }

    let mut outcome = CopyOutcome::default();

    if source.exists_file(source_root)? {
        let dest_path = if dest.exists_dir(dest_root)? {
            format!("{}/{}", dest_root, PathResolver::base_name(source_root))
        } else {
            dest_root.to_string()
        };
        transfer(source, dest, source_root, &dest_path)?;
        outcome.files_copied += 1;
        return Ok(outcome);
    }

    if dest.exists_dir(dest_root)? && dest.count_dir_children(dest_root)? != 0 {
        return Err(CopyError::DestinationNotEmpty(dest_root.to_string()));
    }

    copy_dir(source, dest, source_root, source_root, dest_root, &mut outcome)?;
    Ok(outcome)
}

fn copy_dir<S, D>(
    source: &mut S,
    dest: &mut D,
    dir: &str,
    source_root: &str,
    dest_root: &str,
    outcome: &mut CopyOutcome,
) -> Result<(), CopyError>
where
    S: FileStore + ?Sized,
    D: FileStore + ?Sized,
{
    let suffix = suffix_of(dir, source_root)?;
    let dest_dir = format!("{}{}", dest_root, suffix);
    dest.mkdir(&dest_dir)?;
    outcome.dirs_created += 1;

    for child in source.list(dir)? {
        if child.is_dir {
            copy_dir(source, dest, &child.path, source_root, dest_root, outcome)?;
        } else {
            let suffix = suffix_of(&child.path, source_root)?;
            let dest_path = format!("{}{}", dest_root, suffix);
            transfer(source, dest, &child.path, &dest_path)?;
            outcome.files_copied += 1;
        }
    }
    Ok(())
}

/// Streams one file from source to destination
///
/// Both handles are scoped to this call, so they are released on every
/// exit path, including a mid-copy failure.
fn transfer<S, D>(source: &mut S, dest: &mut D, from: &str, to: &str) -> Result<(), CopyError>
where
    S: FileStore + ?Sized,
    D: FileStore + ?Sized,
{
    let mut reader = source.read_file(from).map_err(|e| CopyError::FileTransfer {
        path: from.to_string(),
        source: e,
    })?;
    dest.create_file(to, reader.as_mut())
        .map_err(|e| CopyError::FileTransfer {
            path: from.to_string(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_store::{FailingStore, FailurePolicy, MemoryStore};
    use std::io::Read;

    fn read_to_string(store: &mut MemoryStore, path: &str) -> String {
        let mut out = String::new();
        store
            .read_file(path)
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    fn sample_source() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.create_file_bytes("/src/a.txt", b"hi").unwrap();
        store.create_file_bytes("/src/sub/b.txt", b"yo").unwrap();
        store
    }

    fn paths_under(store: &mut MemoryStore, dir: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut pending = vec![dir.to_string()];
        while let Some(current) = pending.pop() {
            for entry in store.list(&current).unwrap() {
                found.push(entry.path.clone());
                if entry.is_dir {
                    pending.push(entry.path);
                }
            }
        }
        found.sort_unstable();
        found
    }

    #[test]
    fn test_directory_round_trip() {
        let mut source = sample_source();
        let mut dest = MemoryStore::new();

        let outcome = copy_tree(&mut source, &mut dest, "/src", "/dst").unwrap();

        assert_eq!(outcome.files_copied, 2);
        assert_eq!(outcome.dirs_created, 2);
        assert_eq!(read_to_string(&mut dest, "/dst/a.txt"), "hi");
        assert_eq!(read_to_string(&mut dest, "/dst/sub/b.txt"), "yo");
        assert_eq!(
            paths_under(&mut dest, "/dst"),
            vec![
                "/dst/a.txt".to_string(),
                "/dst/sub".to_string(),
                "/dst/sub/b.txt".to_string(),
            ]
        );
    }

    #[test]
    fn test_source_missing() {
        let mut source = MemoryStore::new();
        let mut dest = MemoryStore::new();

        assert!(matches!(
            copy_tree(&mut source, &mut dest, "/nope", "/dst"),
            Err(CopyError::SourceMissing(_))
        ));
    }

    #[test]
    fn test_single_file_to_literal_path() {
        let mut source = sample_source();
        let mut dest = MemoryStore::new();

        let outcome = copy_tree(&mut source, &mut dest, "/src/a.txt", "/out/copy.txt").unwrap();

        assert_eq!(outcome.files_copied, 1);
        assert_eq!(outcome.dirs_created, 0);
        assert_eq!(read_to_string(&mut dest, "/out/copy.txt"), "hi");
    }

    #[test]
    fn test_single_file_into_existing_dir() {
        let mut source = sample_source();
        let mut dest = MemoryStore::new();
        dest.mkdir("/out").unwrap();

        copy_tree(&mut source, &mut dest, "/src/a.txt", "/out").unwrap();
        assert_eq!(read_to_string(&mut dest, "/out/a.txt"), "hi");
    }

    #[test]
    fn test_single_file_skips_emptiness_guard() {
        let mut source = sample_source();
        let mut dest = MemoryStore::new();
        dest.create_file_bytes("/out/existing.txt", b"x").unwrap();

        // A populated destination directory only blocks directory copies.
        copy_tree(&mut source, &mut dest, "/src/a.txt", "/out").unwrap();
        assert_eq!(read_to_string(&mut dest, "/out/a.txt"), "hi");
        assert_eq!(read_to_string(&mut dest, "/out/existing.txt"), "x");
    }

    #[test]
    fn test_populated_destination_refused() {
        let mut source = sample_source();
        let mut dest = MemoryStore::new();
        dest.create_file_bytes("/dst/already.txt", b"x").unwrap();

        assert!(matches!(
            copy_tree(&mut source, &mut dest, "/src", "/dst"),
            Err(CopyError::DestinationNotEmpty(_))
        ));
        // Nothing was written.
        assert_eq!(paths_under(&mut dest, "/dst"), vec!["/dst/already.txt".to_string()]);
    }

    #[test]
    fn test_empty_destination_dir_is_fine() {
        let mut source = sample_source();
        let mut dest = MemoryStore::new();
        dest.mkdir("/dst").unwrap();

        copy_tree(&mut source, &mut dest, "/src", "/dst").unwrap();
        assert_eq!(read_to_string(&mut dest, "/dst/a.txt"), "hi");
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        let mut source = sample_source();
        let mut dest = MemoryStore::new();

        copy_tree(&mut source, &mut dest, "/src/", "/dst/").unwrap();
        assert_eq!(read_to_string(&mut dest, "/dst/a.txt"), "hi");
    }

    #[test]
    fn test_deep_chain_created() {
        let mut source = MemoryStore::new();
        source
            .create_file_bytes("/in/a/b/c/deep.txt", b"deep")
            .unwrap();
        let mut dest = MemoryStore::new();

        let outcome = copy_tree(&mut source, &mut dest, "/in", "/out").unwrap();

        assert_eq!(outcome.dirs_created, 4);
        assert_eq!(read_to_string(&mut dest, "/out/a/b/c/deep.txt"), "deep");
    }

    #[test]
    fn test_fail_fast_aborts_traversal() {
        let mut source = MemoryStore::new();
        source.create_file_bytes("/src/a.txt", b"1").unwrap();
        source.create_file_bytes("/src/b.txt", b"2").unwrap();
        source.create_file_bytes("/src/c.txt", b"3").unwrap();

        let mut dest = FailingStore::new(MemoryStore::new(), FailurePolicy::AfterWrites(1));

        let result = copy_tree(&mut source, &mut dest, "/src", "/dst");
        match result {
            Err(CopyError::FileTransfer { path, .. }) => {
                assert_eq!(path, "/src/b.txt");
            }
            other => panic!("expected transfer failure, got {:?}", other),
        }

        // The first file made it, nothing after the failure did.
        assert_eq!(dest.write_count(), 1);
        assert!(dest.inner_mut().exists_file("/dst/a.txt").unwrap());
        assert!(!dest.inner_mut().exists("/dst/b.txt").unwrap());
        assert!(!dest.inner_mut().exists("/dst/c.txt").unwrap());
    }

    #[test]
    fn test_copy_empty_directory() {
        let mut source = MemoryStore::new();
        source.mkdir("/empty").unwrap();
        let mut dest = MemoryStore::new();

        let outcome = copy_tree(&mut source, &mut dest, "/empty", "/dst").unwrap();

        assert_eq!(outcome.files_copied, 0);
        assert_eq!(outcome.dirs_created, 1);
        assert!(dest.exists_dir("/dst").unwrap());
        assert_eq!(dest.count_dir_children("/dst").unwrap(), 0);
    }
}

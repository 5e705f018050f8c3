//! Store capability trait and shared types
//!
//! This module defines the operation set every backend must satisfy and
//! the error taxonomy those operations report.

use std::fmt;
use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by store backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// No file or directory at the path
    #[error("No such file or folder: {0}")]
    NotFound(String),

    /// The path names a directory where a file was required
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// The path names a file where a directory was required
    #[error("Not a folder: {0}")]
    NotADirectory(String),

    /// The path is already occupied
    #[error("Path already exists: {0}")]
    AlreadyExists(String),

    /// A non-recursive delete hit a populated directory
    #[error("The folder is not empty: {0}")]
    DirectoryNotEmpty(String),

    /// A store URI could not be parsed
    #[error("Invalid store URI: {0}")]
    InvalidUri(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The transport to a remote store failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote store reported a failure
    #[error("Remote store error: {0}")]
    Remote(String),
}

/// A single entry returned when listing a directory
///
/// A transient view of a child node, not an owned resource: the path and
/// whether it is a directory are all a caller may rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Full path of the entry
    pub path: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl DirEntry {
    /// Creates a new entry
    pub fn new(path: impl Into<String>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            is_dir,
        }
    }

    /// Creates a file entry
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, false)
    }

    /// Creates a directory entry
    pub fn dir(path: impl Into<String>) -> Self {
        Self::new(path, true)
    }

    /// Returns the final component of the entry's path
    pub fn name(&self) -> &str {
        fs_path::PathResolver::base_name(&self.path)
    }
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dir {
            write!(f, "{} <dir>", self.path)
        } else {
            write!(f, "{}", self.path)
        }
    }
}

/// The uniform capability surface of a backing store
///
/// All operations are synchronous and single-threaded; a stream handle
/// returned by [`read_file`](FileStore::read_file) is released when it
/// is dropped. Callers pass canonical paths for the managed and remote
/// stores and platform paths for the local disk.
pub trait FileStore {
    /// Returns whether anything exists at the path
    fn exists(&mut self, path: &str) -> Result<bool, StoreError>;

    /// Returns whether a file exists at the path
    fn exists_file(&mut self, path: &str) -> Result<bool, StoreError>;

    /// Returns whether a directory exists at the path
    fn exists_dir(&mut self, path: &str) -> Result<bool, StoreError>;

    /// Lists the direct children of a directory
    ///
    /// Child order is backend-defined.
    fn list(&mut self, path: &str) -> Result<Vec<DirEntry>, StoreError>;

    /// Opens a read stream on a file
    fn read_file(&mut self, path: &str) -> Result<Box<dyn Read>, StoreError>;

    /// Creates or overwrites a file from a read stream
    fn create_file(&mut self, path: &str, reader: &mut dyn Read) -> Result<(), StoreError>;

    /// Creates a directory and any missing ancestors
    ///
    /// Succeeds if the directory already exists.
    fn mkdir(&mut self, path: &str) -> Result<(), StoreError>;

    /// Deletes a file
    fn delete_file(&mut self, path: &str) -> Result<(), StoreError>;

    /// Deletes a directory
    ///
    /// A non-recursive delete of a populated directory fails with
    /// [`StoreError::DirectoryNotEmpty`].
    fn delete_dir(&mut self, path: &str, recursive: bool) -> Result<(), StoreError>;

    /// Creates an empty file, leaving an existing file untouched
    fn touch_file(&mut self, path: &str) -> Result<(), StoreError>;

    /// Counts the direct children of a directory
    fn count_dir_children(&mut self, path: &str) -> Result<usize, StoreError>;

    /// Creates or overwrites a file from a byte slice
    fn create_file_bytes(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut reader = bytes;
        self.create_file(path, &mut reader)
    }
}

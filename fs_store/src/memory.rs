//! In-memory store backend
//!
//! A deterministic stand-in for the managed store engine, which lives
//! outside this workspace. The console and the test suites run against
//! it; nothing above the [`FileStore`] trait can tell the difference.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use fs_path::PathResolver;

use crate::store::{DirEntry, FileStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// In-memory hierarchical store
///
/// Nodes are keyed by canonical path in a `BTreeMap`, so listings come
/// back in lexicographic order. The root `/` always exists and is never
/// stored as a node itself. Creating a file or directory records every
/// missing ancestor as a directory, so a directory's ancestors always
/// exist.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    nodes: BTreeMap<String, Node>,
}

impl MemoryStore {
    /// Creates an empty store containing only the root
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the store, the root excluded
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the store holds nothing but the root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn child_prefix(path: &str) -> String {
        if path == "/" {
            "/".to_string()
        } else {
            format!("{}/", path)
        }
    }

    fn children(&self, path: &str) -> Vec<(&String, &Node)> {
        let prefix = Self::child_prefix(path);
        self.nodes
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix) && !key[prefix.len()..].contains('/'))
            .collect()
    }

    fn ensure_ancestors(&mut self, path: &str) -> Result<(), StoreError> {
        let mut ancestor = PathResolver::parent(path)
            .map_err(|_| StoreError::NotFound(path.to_string()))?;
        while let Some(dir) = ancestor {
            if dir == "/" {
                break;
            }
            match self.nodes.get(&dir) {
                Some(Node::Dir) => break,
                Some(Node::File(_)) => return Err(StoreError::NotADirectory(dir)),
                None => {
                    self.nodes.insert(dir.clone(), Node::Dir);
                }
            }
            ancestor = PathResolver::parent(&dir)
                .map_err(|_| StoreError::NotFound(dir.clone()))?;
        }
        Ok(())
    }
}

impl FileStore for MemoryStore {
    fn exists(&mut self, path: &str) -> Result<bool, StoreError> {
        Ok(path == "/" || self.nodes.contains_key(path))
    }

    fn exists_file(&mut self, path: &str) -> Result<bool, StoreError> {
        Ok(matches!(self.nodes.get(path), Some(Node::File(_))))
    }

    fn exists_dir(&mut self, path: &str) -> Result<bool, StoreError> {
        Ok(path == "/" || matches!(self.nodes.get(path), Some(Node::Dir)))
    }

    fn list(&mut self, path: &str) -> Result<Vec<DirEntry>, StoreError> {
        if !self.exists_dir(path)? {
            return if self.exists_file(path)? {
                Err(StoreError::NotADirectory(path.to_string()))
            } else {
                Err(StoreError::NotFound(path.to_string()))
            };
        }
        Ok(self
            .children(path)
            .into_iter()
            .map(|(key, node)| DirEntry::new(key.clone(), matches!(node, Node::Dir)))
            .collect())
    }

    fn read_file(&mut self, path: &str) -> Result<Box<dyn Read>, StoreError> {
        match self.nodes.get(path) {
            Some(Node::File(bytes)) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Some(Node::Dir) => Err(StoreError::NotAFile(path.to_string())),
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }

    fn create_file(&mut self, path: &str, reader: &mut dyn Read) -> Result<(), StoreError> {
        if matches!(self.nodes.get(path), Some(Node::Dir)) {
            return Err(StoreError::NotAFile(path.to_string()));
        }
        self.ensure_ancestors(path)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(StoreError::Io)?;
        self.nodes.insert(path.to_string(), Node::File(bytes));
        Ok(())
    }

    fn mkdir(&mut self, path: &str) -> Result<(), StoreError> {
        if path == "/" {
            return Ok(());
        }
        match self.nodes.get(path) {
            Some(Node::Dir) => Ok(()),
            Some(Node::File(_)) => Err(StoreError::AlreadyExists(path.to_string())),
            None => {
                self.ensure_ancestors(path)?;
                self.nodes.insert(path.to_string(), Node::Dir);
                Ok(())
            }
        }
    }

    fn delete_file(&mut self, path: &str) -> Result<(), StoreError> {
        match self.nodes.get(path) {
            Some(Node::File(_)) => {
                self.nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir) => Err(StoreError::NotAFile(path.to_string())),
            None => Err(StoreError::NotFound(path.to_string())),
        }
    }

    fn delete_dir(&mut self, path: &str, recursive: bool) -> Result<(), StoreError> {
        if !self.exists_dir(path)? {
            return if self.exists_file(path)? {
                Err(StoreError::NotADirectory(path.to_string()))
            } else {
                Err(StoreError::NotFound(path.to_string()))
            };
        }
        let child_count = self.children(path).len();
        if child_count > 0 && !recursive {
            return Err(StoreError::DirectoryNotEmpty(path.to_string()));
        }
        let prefix = Self::child_prefix(path);
        self.nodes.retain(|key, _| !key.starts_with(&prefix));
        self.nodes.remove(path);
        Ok(())
    }

    fn touch_file(&mut self, path: &str) -> Result<(), StoreError> {
        match self.nodes.get(path) {
            Some(Node::File(_)) => Ok(()),
            Some(Node::Dir) => Err(StoreError::NotAFile(path.to_string())),
            None => {
                self.ensure_ancestors(path)?;
                self.nodes.insert(path.to_string(), Node::File(Vec::new()));
                Ok(())
            }
        }
    }

    fn count_dir_children(&mut self, path: &str) -> Result<usize, StoreError> {
        if !self.exists_dir(path)? {
            return Err(StoreError::NotADirectory(path.to_string()));
        }
        Ok(self.children(path).len())
    }
}

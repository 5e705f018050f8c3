//! Local-disk store backend
//!
//! A thin adapter from the [`FileStore`] capability surface onto
//! `std::fs`. Paths handed to this backend are platform paths; entries
//! come back with forward slashes so the rest of the system sees one
//! separator.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::path::Path;

use crate::store::{DirEntry, FileStore, StoreError};

/// Local filesystem adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    /// Creates the adapter
    pub fn new() -> Self {
        Self
    }

    fn map_io(path: &str, error: io::Error) -> StoreError {
        if error.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(path.to_string())
        } else {
            StoreError::Io(error)
        }
    }

    fn entry_path(entry: &fs::DirEntry) -> String {
        entry.path().to_string_lossy().replace('\\', "/")
    }
}

impl FileStore for LocalStore {
    fn exists(&mut self, path: &str) -> Result<bool, StoreError> {
        Ok(Path::new(path).exists())
    }

    fn exists_file(&mut self, path: &str) -> Result<bool, StoreError> {
        Ok(Path::new(path).is_file())
    }

    fn exists_dir(&mut self, path: &str) -> Result<bool, StoreError> {
        Ok(Path::new(path).is_dir())
    }

    fn list(&mut self, path: &str) -> Result<Vec<DirEntry>, StoreError> {
        if Path::new(path).is_file() {
            return Err(StoreError::NotADirectory(path.to_string()));
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| Self::map_io(path, e))? {
            let entry = entry.map_err(|e| Self::map_io(path, e))?;
            let file_type = entry.file_type().map_err(|e| Self::map_io(path, e))?;
            entries.push(DirEntry::new(Self::entry_path(&entry), file_type.is_dir()));
        }
        Ok(entries)
    }

    fn read_file(&mut self, path: &str) -> Result<Box<dyn Read>, StoreError> {
        if Path::new(path).is_dir() {
            return Err(StoreError::NotAFile(path.to_string()));
        }
        let file = File::open(path).map_err(|e| Self::map_io(path, e))?;
        Ok(Box::new(file))
    }

    fn create_file(&mut self, path: &str, reader: &mut dyn Read) -> Result<(), StoreError> {
        if Path::new(path).is_dir() {
            return Err(StoreError::NotAFile(path.to_string()));
        }
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = File::create(path).map_err(|e| Self::map_io(path, e))?;
        io::copy(reader, &mut file)?;
        Ok(())
    }

    fn mkdir(&mut self, path: &str) -> Result<(), StoreError> {
        fs::create_dir_all(path).map_err(|e| Self::map_io(path, e))
    }

    fn delete_file(&mut self, path: &str) -> Result<(), StoreError> {
        if Path::new(path).is_dir() {
            return Err(StoreError::NotAFile(path.to_string()));
        }
        fs::remove_file(path).map_err(|e| Self::map_io(path, e))
    }

    fn delete_dir(&mut self, path: &str, recursive: bool) -> Result<(), StoreError> {
        if !Path::new(path).is_dir() {
            return if Path::new(path).exists() {
                Err(StoreError::NotADirectory(path.to_string()))
            } else {
                Err(StoreError::NotFound(path.to_string()))
            };
        }
        if recursive {
            fs::remove_dir_all(path).map_err(|e| Self::map_io(path, e))
        } else {
            if self.count_dir_children(path)? > 0 {
                return Err(StoreError::DirectoryNotEmpty(path.to_string()));
            }
            fs::remove_dir(path).map_err(|e| Self::map_io(path, e))
        }
    }

    fn touch_file(&mut self, path: &str) -> Result<(), StoreError> {
        if Path::new(path).is_dir() {
            return Err(StoreError::NotAFile(path.to_string()));
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| Self::map_io(path, e))?;
        Ok(())
    }

    fn count_dir_children(&mut self, path: &str) -> Result<usize, StoreError> {
        if !Path::new(path).is_dir() {
            return Err(StoreError::NotADirectory(path.to_string()));
        }
        let entries = fs::read_dir(path).map_err(|e| Self::map_io(path, e))?;
        Ok(entries.count())
    }
}

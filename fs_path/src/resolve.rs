//! Working-directory path resolution
//!
//! This module handles normalizing raw path strings and resolving them
//! against a working directory.

use thiserror::Error;

/// Errors that can occur during path resolution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Path is empty, malformed, or contains a reserved character
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// An absolute path was required but a relative one was given
    #[error("Not an absolute path: {0}")]
    NotAbsolute(String),

    /// Suffix computation was given a root that is not a prefix
    #[error("'{root}' is not a prefix of '{path}'")]
    PrefixMismatch {
        /// The full path the root was removed from
        path: String,
        /// The root that failed to match
        root: String,
    },
}

/// Path resolver
///
/// Resolves raw input paths against a working directory. Centralizing
/// the `.`/`..`/absolute/relative arithmetic here keeps every command
/// handler free of string surgery.
pub struct PathResolver;

impl PathResolver {
    /// Normalizes a raw path string
    ///
    /// Replaces backslashes with forward slashes and trims a trailing
    /// slash unless the result is the root itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use fs_path::PathResolver;
    ///
    /// assert_eq!(PathResolver::normalize("\\usr\\docs\\"), "/usr/docs");
    /// assert_eq!(PathResolver::normalize("/"), "/");
    /// ```
    pub fn normalize(raw: &str) -> String {
        let path = raw.replace('\\', "/");
        Self::remove_trailing_slash(&path).to_string()
    }

    /// Removes a trailing slash unless the path is exactly the root
    pub fn remove_trailing_slash(path: &str) -> &str {
        if path.ends_with('/') && path != "/" {
            &path[..path.len() - 1]
        } else {
            path
        }
    }

    /// Strips a platform drive marker from a pasted absolute path
    ///
    /// Fires only when the second byte is `:` and the first byte lies
    /// strictly between `'A'` and `'z'`; drives named `A:` or `z:` are
    /// left intact.
    pub fn strip_drive_marker(path: &str) -> &str {
        let bytes = path.as_bytes();
        if bytes.len() >= 2 && bytes[1] == b':' && bytes[0] > b'A' && bytes[0] < b'z' {
            &path[2..]
        } else {
            path
        }
    }

    /// Resolves a raw input path against the working directory
    ///
    /// `.` is the working directory itself and `..` its parent (the root
    /// is its own parent). A path with a leading `/` stands alone; any
    /// other input is joined below the working directory.
    ///
    /// Returns [`PathError::NotAbsolute`] if `..` is resolved against a
    /// working directory that contains no `/` — callers must only ever
    /// hold absolute working directories.
    pub fn resolve(raw: &str, cwd: &str) -> Result<String, PathError> {
        let normalized = Self::normalize(raw);
        let path = Self::strip_drive_marker(&normalized);

        if path == "." {
            return Ok(cwd.to_string());
        }
        if path == ".." {
            if cwd == "/" {
                return Ok("/".to_string());
            }
            return match cwd.rfind('/') {
                Some(0) => Ok("/".to_string()),
                Some(index) => Ok(cwd[..index].to_string()),
                None => Err(PathError::NotAbsolute(cwd.to_string())),
            };
        }
        if path.starts_with('/') {
            return Ok(path.to_string());
        }
        Ok(format!("{}/{}", cwd, path))
    }

    /// Returns the parent of an absolute path, or `None` for the root
    ///
    /// Returns [`PathError::NotAbsolute`] if the path contains no `/`
    /// after trimming a trailing slash.
    pub fn parent(path: &str) -> Result<Option<String>, PathError> {
        if path == "/" {
            return Ok(None);
        }
        let path = Self::remove_trailing_slash(path);
        match path.rfind('/') {
            None => Err(PathError::NotAbsolute(path.to_string())),
            Some(0) => Ok(Some("/".to_string())),
            Some(index) => Ok(Some(path[..index].to_string())),
        }
    }

    /// Returns the final component of a canonical path
    pub fn base_name(path: &str) -> &str {
        let path = Self::remove_trailing_slash(path);
        match path.rfind('/') {
            Some(index) => &path[index + 1..],
            None => path,
        }
    }

    /// Validates a directory path before it reaches a backend
    pub fn validate_dir_path(path: &str) -> Result<(), PathError> {
        if path.is_empty() {
            return Err(PathError::InvalidPath(
                "Dir path can not be empty".to_string(),
            ));
        }
        if path.contains(':') {
            return Err(PathError::InvalidPath(format!(
                "Path can not contain ':': {}",
                path
            )));
        }
        Ok(())
    }

    /// Validates a file path before it reaches a backend
    pub fn validate_file_path(path: &str) -> Result<(), PathError> {
        if path.is_empty() {
            return Err(PathError::InvalidPath(
                "File path can not be empty".to_string(),
            ));
        }
        if path.contains(':') {
            return Err(PathError::InvalidPath(format!(
                "Path can not contain ':': {}",
                path
            )));
        }
        Ok(())
    }
}

//! Session state
//!
//! The session owns the working directory: a single canonical path,
//! seeded at bootstrap and mutated only by a successful directory
//! change. It is passed explicitly wherever resolution happens; there
//! is no global state.

use fs_path::{PathError, PathResolver};
use fs_store::{FileStore, StoreError};
use thiserror::Error;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// Path resolution failed
    #[error(transparent)]
    Path(#[from] PathError),

    /// The backing store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A directory change named something that is not a directory
    #[error("No such folder: {0}")]
    NoSuchFolder(String),
}

/// Working-directory context for one interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    cwd: String,
}

impl Session {
    /// Starts a session rooted at `<home_root>/<user>`
    ///
    /// The home directory is created on the managed store if it is not
    /// there yet.
    pub fn bootstrap<S: FileStore + ?Sized>(
        home_root: &str,
        user: &str,
        store: &mut S,
    ) -> Result<Self, SessionError> {
        let home_root = PathResolver::remove_trailing_slash(home_root);
        let cwd = format!("{}/{}", home_root, user);
        store.mkdir(&cwd)?;
        Ok(Self { cwd })
    }

    /// Creates a session at an explicit working directory
    pub fn at(cwd: impl Into<String>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Returns the current working directory
    pub fn working_dir(&self) -> &str {
        &self.cwd
    }

    /// Resolves a raw input path against the working directory
    pub fn resolve(&self, raw: &str) -> Result<String, PathError> {
        PathResolver::resolve(raw, &self.cwd)
    }

    /// Changes the working directory
    ///
    /// The target must resolve to an existing directory; otherwise the
    /// working directory is left untouched.
    pub fn change_dir<S: FileStore + ?Sized>(
        &mut self,
        raw: &str,
        store: &mut S,
    ) -> Result<(), SessionError> {
        let target = self.resolve(raw)?;
        if !store.exists_dir(&target)? {
            return Err(SessionError::NoSuchFolder(target));
        }
        self.cwd = target;
        Ok(())
    }
}

//! Failing store wrapper
//!
//! A [`FileStore`] wrapper that injects write failures, for testing
//! abort paths without an actual misbehaving backend.

use std::io::{self, Read};

use crate::store::{DirEntry, FileStore, StoreError};

/// Policy for when write failures occur
#[derive(Debug, Clone)]
pub enum FailurePolicy {
    /// Never fail (passthrough)
    Never,
    /// Fail once N file writes have succeeded
    AfterWrites(usize),
    /// Fail on specific destination paths
    OnPaths(Vec<String>),
}

/// Wrapper around a store that can simulate write failures
pub struct FailingStore<S: FileStore> {
    inner: S,
    policy: FailurePolicy,
    write_count: usize,
}

impl<S: FileStore> FailingStore<S> {
    /// Creates a failing store with the given policy
    pub fn new(inner: S, policy: FailurePolicy) -> Self {
        Self {
            inner,
            policy,
            write_count: 0,
        }
    }

    /// Returns the wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns mutable access to the wrapped store
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Returns the number of file writes that have gone through
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Replaces the failure policy and resets the write counter
    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
        self.write_count = 0;
    }

    fn should_fail(&self, path: &str) -> bool {
        match &self.policy {
            FailurePolicy::Never => false,
            FailurePolicy::AfterWrites(n) => self.write_count >= *n,
            FailurePolicy::OnPaths(paths) => paths.iter().any(|p| p == path),
        }
    }
}

impl<S: FileStore> FileStore for FailingStore<S> {
    fn exists(&mut self, path: &str) -> Result<bool, StoreError> {
        self.inner.exists(path)
    }

    fn exists_file(&mut self, path: &str) -> Result<bool, StoreError> {
        self.inner.exists_file(path)
    }

    fn exists_dir(&mut self, path: &str) -> Result<bool, StoreError> {
        self.inner.exists_dir(path)
    }

    fn list(&mut self, path: &str) -> Result<Vec<DirEntry>, StoreError> {
        self.inner.list(path)
    }

    fn read_file(&mut self, path: &str) -> Result<Box<dyn Read>, StoreError> {
        self.inner.read_file(path)
    }

    fn create_file(&mut self, path: &str, reader: &mut dyn Read) -> Result<(), StoreError> {
        if self.should_fail(path) {
            return Err(StoreError::Io(io::Error::other("injected write failure")));
        }
        self.write_count += 1;
        self.inner.create_file(path, reader)
    }

    fn mkdir(&mut self, path: &str) -> Result<(), StoreError> {
        self.inner.mkdir(path)
    }

    fn delete_file(&mut self, path: &str) -> Result<(), StoreError> {
        self.inner.delete_file(path)
    }

    fn delete_dir(&mut self, path: &str, recursive: bool) -> Result<(), StoreError> {
        self.inner.delete_dir(path, recursive)
    }

    fn touch_file(&mut self, path: &str) -> Result<(), StoreError> {
        self.inner.touch_file(path)
    }

    fn count_dir_children(&mut self, path: &str) -> Result<usize, StoreError> {
        self.inner.count_dir_children(path)
    }
}

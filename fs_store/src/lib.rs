//! # Store Backends
//!
//! This crate defines the uniform capability surface every backing store
//! exposes to the console, and the backends that implement it.
//!
//! ## Design
//!
//! - One trait, [`FileStore`], carries the whole operation set; nothing
//!   above it ever branches on which concrete backend it holds
//! - [`MemoryStore`] is the deterministic in-memory stand-in for the
//!   managed store engine, which lives outside this workspace
//! - [`LocalStore`] adapts the local disk
//! - [`RemoteStore`] reaches a secondary hierarchical store through a
//!   [`StoreTransport`], speaking encoded request/response envelopes
//! - [`FailingStore`] wraps any backend and injects write failures for
//!   testing abort paths

pub mod faulty;
pub mod local;
pub mod memory;
pub mod remote;
pub mod store;

pub use faulty::{FailingStore, FailurePolicy};
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use remote::{
    InProcessTransport, RemoteStore, RequestEnvelope, RequestId, ResponseEnvelope, StoreRequest,
    StoreResponse, StoreTransport, StoreUri,
};
pub use store::{DirEntry, FileStore, StoreError};

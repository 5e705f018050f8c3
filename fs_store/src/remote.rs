//! Secondary-store client
//!
//! The secondary hierarchical store is reached through a transport that
//! carries one encoded request/response pair at a time. The client maps
//! every [`FileStore`] operation onto a [`StoreRequest`], and a loopback
//! transport lets any in-process backend stand behind the same boundary
//! for wiring and tests.

use std::io::{Cursor, Read};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{DirEntry, FileStore, StoreError};

/// Unique id carried by one request/response pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// One store operation, encoded for the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreRequest {
    Exists { path: String },
    ExistsFile { path: String },
    ExistsDir { path: String },
    List { path: String },
    ReadFile { path: String },
    CreateFile { path: String, bytes: Vec<u8> },
    Mkdir { path: String },
    DeleteFile { path: String },
    DeleteDir { path: String, recursive: bool },
    TouchFile { path: String },
    CountDirChildren { path: String },
}

/// Result of one store operation, encoded for the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreResponse {
    Flag(bool),
    Entries(Vec<DirEntry>),
    Bytes(Vec<u8>),
    Count(u64),
    Done,
    Error(String),
}

/// Request envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Id echoed back by the response
    pub request_id: RequestId,
    /// The operation to perform
    pub request: StoreRequest,
}

/// Response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Id of the request this answers
    pub request_id: RequestId,
    /// The operation's result
    pub response: StoreResponse,
}

/// Transport carrying envelopes to the secondary store
///
/// Request/response with a single in-flight call; the console runs one
/// command at a time, so nothing more is needed.
pub trait StoreTransport {
    /// Delivers a request and blocks for its response
    fn call(&mut self, envelope: RequestEnvelope) -> Result<ResponseEnvelope, StoreError>;
}

/// A `store://authority/path` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUri {
    /// The authority the transport connects to
    pub endpoint: String,
    /// The path inside the secondary store's namespace
    pub path: String,
}

impl StoreUri {
    /// The accepted URI scheme
    pub const SCHEME: &'static str = "store://";

    /// Parses a `store://authority/path` URI
    ///
    /// The scheme is matched case-insensitively. The authority must be
    /// non-empty and must be followed by an absolute path.
    pub fn parse(uri: &str) -> Result<Self, StoreError> {
        let scheme_len = Self::SCHEME.len();
        if uri.len() < scheme_len || !uri[..scheme_len].eq_ignore_ascii_case(Self::SCHEME) {
            return Err(StoreError::InvalidUri(uri.to_string()));
        }
        let rest = &uri[scheme_len..];
        match rest.find('/') {
            None | Some(0) => Err(StoreError::InvalidUri(uri.to_string())),
            Some(index) => Ok(Self {
                endpoint: rest[..index].to_string(),
                path: rest[index..].to_string(),
            }),
        }
    }
}

/// Client for the secondary hierarchical store
///
/// Every trait operation becomes one transport round trip. A response
/// whose id does not match the request, or whose variant does not match
/// the operation, is a transport fault.
pub struct RemoteStore<T: StoreTransport> {
    transport: T,
}

impl<T: StoreTransport> RemoteStore<T> {
    /// Creates a client over the given transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    fn roundtrip(&mut self, request: StoreRequest) -> Result<StoreResponse, StoreError> {
        let envelope = RequestEnvelope {
            request_id: RequestId::new(),
            request,
        };
        let request_id = envelope.request_id;
        let reply = self.transport.call(envelope)?;
        if reply.request_id != request_id {
            return Err(StoreError::Transport(
                "response does not match request id".to_string(),
            ));
        }
        if let StoreResponse::Error(message) = reply.response {
            return Err(StoreError::Remote(message));
        }
        Ok(reply.response)
    }

    fn roundtrip_flag(&mut self, request: StoreRequest) -> Result<bool, StoreError> {
        match self.roundtrip(request)? {
            StoreResponse::Flag(value) => Ok(value),
            other => Err(unexpected(other)),
        }
    }

    fn roundtrip_done(&mut self, request: StoreRequest) -> Result<(), StoreError> {
        match self.roundtrip(request)? {
            StoreResponse::Done => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: StoreResponse) -> StoreError {
    StoreError::Transport(format!("unexpected response: {:?}", response))
}

impl<T: StoreTransport> FileStore for RemoteStore<T> {
    fn exists(&mut self, path: &str) -> Result<bool, StoreError> {
        self.roundtrip_flag(StoreRequest::Exists {
            path: path.to_string(),
        })
    }

    fn exists_file(&mut self, path: &str) -> Result<bool, StoreError> {
        self.roundtrip_flag(StoreRequest::ExistsFile {
            path: path.to_string(),
        })
    }

    fn exists_dir(&mut self, path: &str) -> Result<bool, StoreError> {
        self.roundtrip_flag(StoreRequest::ExistsDir {
            path: path.to_string(),
        })
    }

    fn list(&mut self, path: &str) -> Result<Vec<DirEntry>, StoreError> {
        match self.roundtrip(StoreRequest::List {
            path: path.to_string(),
        })? {
            StoreResponse::Entries(entries) => Ok(entries),
            other => Err(unexpected(other)),
        }
    }

    fn read_file(&mut self, path: &str) -> Result<Box<dyn Read>, StoreError> {
        match self.roundtrip(StoreRequest::ReadFile {
            path: path.to_string(),
        })? {
            StoreResponse::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes))),
            other => Err(unexpected(other)),
        }
    }

    fn create_file(&mut self, path: &str, reader: &mut dyn Read) -> Result<(), StoreError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(StoreError::Io)?;
        self.roundtrip_done(StoreRequest::CreateFile {
            path: path.to_string(),
            bytes,
        })
    }

    fn mkdir(&mut self, path: &str) -> Result<(), StoreError> {
        self.roundtrip_done(StoreRequest::Mkdir {
            path: path.to_string(),
        })
    }

    fn delete_file(&mut self, path: &str) -> Result<(), StoreError> {
        self.roundtrip_done(StoreRequest::DeleteFile {
            path: path.to_string(),
        })
    }

    fn delete_dir(&mut self, path: &str, recursive: bool) -> Result<(), StoreError> {
        self.roundtrip_done(StoreRequest::DeleteDir {
            path: path.to_string(),
            recursive,
        })
    }

    fn touch_file(&mut self, path: &str) -> Result<(), StoreError> {
        self.roundtrip_done(StoreRequest::TouchFile {
            path: path.to_string(),
        })
    }

    fn count_dir_children(&mut self, path: &str) -> Result<usize, StoreError> {
        match self.roundtrip(StoreRequest::CountDirChildren {
            path: path.to_string(),
        })? {
            StoreResponse::Count(count) => Ok(count as usize),
            other => Err(unexpected(other)),
        }
    }
}

/// Loopback transport over any in-process backend
///
/// Envelopes still cross the boundary in their encoded form, so the
/// round trip exercises exactly what a socket transport would carry.
pub struct InProcessTransport<S: FileStore> {
    store: S,
}

impl<S: FileStore> InProcessTransport<S> {
    /// Creates a loopback transport serving the given backend
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the backend behind the transport
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns mutable access to the backend behind the transport
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn serve(&mut self, request: StoreRequest) -> StoreResponse {
        let result = match request {
            StoreRequest::Exists { path } => self.store.exists(&path).map(StoreResponse::Flag),
            StoreRequest::ExistsFile { path } => {
                self.store.exists_file(&path).map(StoreResponse::Flag)
            }
            StoreRequest::ExistsDir { path } => {
                self.store.exists_dir(&path).map(StoreResponse::Flag)
            }
            StoreRequest::List { path } => self.store.list(&path).map(StoreResponse::Entries),
            StoreRequest::ReadFile { path } => self.store.read_file(&path).and_then(|mut reader| {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes).map_err(StoreError::Io)?;
                Ok(StoreResponse::Bytes(bytes))
            }),
            StoreRequest::CreateFile { path, bytes } => self
                .store
                .create_file_bytes(&path, &bytes)
                .map(|_| StoreResponse::Done),
            StoreRequest::Mkdir { path } => self.store.mkdir(&path).map(|_| StoreResponse::Done),
            StoreRequest::DeleteFile { path } => {
                self.store.delete_file(&path).map(|_| StoreResponse::Done)
            }
            StoreRequest::DeleteDir { path, recursive } => self
                .store
                .delete_dir(&path, recursive)
                .map(|_| StoreResponse::Done),
            StoreRequest::TouchFile { path } => {
                self.store.touch_file(&path).map(|_| StoreResponse::Done)
            }
            StoreRequest::CountDirChildren { path } => self
                .store
                .count_dir_children(&path)
                .map(|count| StoreResponse::Count(count as u64)),
        };
        result.unwrap_or_else(|error| StoreResponse::Error(error.to_string()))
    }
}

impl<S: FileStore> StoreTransport for InProcessTransport<S> {
    fn call(&mut self, envelope: RequestEnvelope) -> Result<ResponseEnvelope, StoreError> {
        let encoded =
            serde_json::to_vec(&envelope).map_err(|e| StoreError::Transport(e.to_string()))?;
        let envelope: RequestEnvelope =
            serde_json::from_slice(&encoded).map_err(|e| StoreError::Transport(e.to_string()))?;

        let response = self.serve(envelope.request);
        let reply = ResponseEnvelope {
            request_id: envelope.request_id,
            response,
        };

        let encoded =
            serde_json::to_vec(&reply).map_err(|e| StoreError::Transport(e.to_string()))?;
        serde_json::from_slice(&encoded).map_err(|e| StoreError::Transport(e.to_string()))
    }
}

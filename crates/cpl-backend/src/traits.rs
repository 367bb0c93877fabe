//! Backend abstraction traits
//!
//! This module defines the request store and document store traits the gateway
//! talks to, and the error classification shared by their implementations.

use async_trait::async_trait;
use bytes::Bytes;
use cpl_core::{AppError, Request, StatusUpdate, UploadFields};
use futures::Stream;
use serde_json::{Map, Value};
use std::fmt;
use std::pin::Pin;
use thiserror::Error;

/// Backend call errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connect failure, timeout or broken transport
    #[error("Backend unreachable: {0}")]
    Unavailable(String),

    /// The backend answered with a non-success HTTP status
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed backend response: {0}")]
    Malformed(String),

    /// 2xx answer carrying `success: false`
    #[error("Backend rejected the request: {0}")]
    Rejected(String),
}

impl BackendError {
    /// HTTP status reported by the backend, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Unavailable(_))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            BackendError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            BackendError::Unavailable(err.to_string())
        }
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(msg) => AppError::BackendUnavailable(msg),
            BackendError::Status {
                status: 409,
                message,
            } => AppError::Conflict(message),
            BackendError::Status {
                status: 404,
                message,
            } => AppError::NotFound(message),
            BackendError::Status { status, message } => AppError::Upstream { status, message },
            BackendError::Malformed(msg) => AppError::MalformedResponse(msg),
            BackendError::Rejected(message) => AppError::Upstream {
                status: 200,
                message,
            },
        }
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Authoritative store of credit-evaluation request records.
///
/// The store serializes concurrent updates. Reads are never cached by callers.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// All requests, in the order the store returns them
    async fn list_requests(&self) -> BackendResult<Vec<Request>>;

    /// Requests submitted under a student identifier
    async fn requests_by_nuid(&self, nuid: &str) -> BackendResult<Vec<Request>>;

    /// Overwrite status, credits and notes of a request and stamp the audit fields.
    ///
    /// When `update.expected_updated_at` is set the store rejects the write with
    /// HTTP 409 if the record changed since that timestamp.
    async fn update_status(&self, request_id: &str, update: &StatusUpdate) -> BackendResult<()>;
}

/// Which rendition of a stored document to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Raw bytes for saving to disk
    Download,
    /// Bytes with the backend's content type for inline display
    Preview,
}

impl FetchMode {
    pub fn route(&self) -> &'static str {
        match self {
            FetchMode::Download => "download-document",
            FetchMode::Preview => "preview-document",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Download => f.write_str("download"),
            FetchMode::Preview => f.write_str("preview"),
        }
    }
}

/// A document to hand to the ingestion pipeline
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
    pub fields: UploadFields,
}

/// Stream of document bytes
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, BackendError>> + Send>>;

/// A document being relayed from the object store
pub struct DocumentStream {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub stream: ByteStream,
}

impl fmt::Debug for DocumentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStream")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Document ingestion and retrieval.
///
/// Uploads fan out to the assistant index, the search index and the object store on
/// the backend side; none of that is visible here beyond the returned JSON.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Upload a document with its student metadata and return the backend's result object
    async fn upload(&self, upload: DocumentUpload) -> BackendResult<Map<String, Value>>;

    /// Fetch a stored document as a byte stream
    async fn fetch(
        &self,
        mode: FetchMode,
        document_id: &str,
        filename: &str,
    ) -> BackendResult<DocumentStream>;

    /// Metadata of a stored document without its bytes
    async fn describe(&self, document_id: &str, filename: &str) -> BackendResult<Value>;
}

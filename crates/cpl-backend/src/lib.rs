//! CPL Backend Library
//!
//! Clients for the backend service that fronts the request store (tabular data lake)
//! and the document transfer pipeline (object store plus search index).
//!
//! The gateway depends only on the `RequestStore` and `DocumentStore` traits;
//! `HttpBackend` is the production implementation of both.

pub mod http;
pub mod traits;

// Re-export commonly used types
pub use http::HttpBackend;
pub use traits::{
    BackendError, BackendResult, ByteStream, DocumentStore, DocumentStream, DocumentUpload,
    FetchMode, RequestStore,
};

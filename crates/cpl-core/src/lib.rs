//! CPL Core Library
//!
//! This crate provides the request model, wire envelopes, error types, configuration
//! and client-side validation shared by the gateway, its HTTP clients and the tracker.

pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, GatewayConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    DataSource, NuidRequestsResponse, Request, RequestListResponse, RequestStatus, StatusUpdate,
    StatusUpdateResponse, UploadFields,
};
pub use validation::{UploadValidator, ValidationError};

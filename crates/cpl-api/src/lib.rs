//! CPL Gateway API Library
//!
//! This crate provides the HTTP handlers, middleware, and application setup of the
//! gateway that sits between the student portal and the backend services.

// Module declarations
mod api_doc;
mod handlers;
mod middleware;
mod telemetry;

// Public modules
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;

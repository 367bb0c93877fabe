//! Application state shared by all handlers.
//!
//! Handlers only read from it; the gateway keeps no mutable state of its own.

use cpl_backend::{DocumentStore, HttpBackend, RequestStore};
use cpl_core::GatewayConfig;
use std::sync::Arc;

pub struct AppState {
    pub config: GatewayConfig,
    pub requests: Arc<dyn RequestStore>,
    pub documents: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        requests: Arc<dyn RequestStore>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            config,
            requests,
            documents,
        }
    }

    /// State backed by the HTTP backend at `config.backend_url` for both stores.
    pub fn with_http_backend(config: GatewayConfig) -> Self {
        let backend = Arc::new(HttpBackend::new(config.backend_url.clone()));
        Self::new(config, backend.clone(), backend)
    }
}

//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use cpl_core::GatewayConfig;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: GatewayConfig) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!(
        backend_url = %config.backend_url,
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let state = Arc::new(AppState::with_http_backend(config));
    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}

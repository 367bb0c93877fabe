//! Static capability descriptor. Dependencies are not checked.

use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
    pub backend_service: String,
    pub features: Vec<String>,
    pub version: String,
}

fn endpoint_map() -> BTreeMap<String, String> {
    [
        ("upload", "POST /api/upload"),
        ("download", "GET /api/download-document/{documentId}/{filename}"),
        ("preview", "GET /api/preview-document/{documentId}/{filename}"),
        ("view", "GET /api/view-document/{documentId}/{filename}"),
        ("requests", "GET /api/requests"),
        ("requestsByNuid", "GET /api/requests-by-nuid/{nuid}"),
        ("updateStatus", "PUT /api/requests/{id}/status"),
        ("openapi", "GET /api/openapi.json"),
    ]
    .into_iter()
    .map(|(name, route)| (name.to_string(), route.to_string()))
    .collect()
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Gateway is running", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: format!("{} running", state.config.service_name),
        endpoints: endpoint_map(),
        backend_service: state.config.backend_url.clone(),
        features: ["Document Downloads", "Request Store", "Document Search"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

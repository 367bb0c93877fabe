use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cpl_core::{
    NuidRequestsResponse, RequestListResponse, StatusUpdate, StatusUpdateResponse,
};
use std::sync::Arc;

/// Error text of the list envelope when the store cannot be queried.
const STORE_UNAVAILABLE: &str = "Request store unavailable";

#[utoipa::path(
    get,
    path = "/api/requests",
    tag = "requests",
    responses(
        (status = 200, description = "All requests from the store", body = RequestListResponse),
        (status = 503, description = "Store unavailable; empty list tagged with source \"error\"", body = RequestListResponse)
    )
)]
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RequestListResponse>) {
    match state.requests.list_requests().await {
        Ok(requests) => {
            tracing::info!(count = requests.len(), "Retrieved requests from store");
            (StatusCode::OK, Json(RequestListResponse::from_store(requests)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch requests from store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(RequestListResponse::unavailable(STORE_UNAVAILABLE)),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/requests-by-nuid/{nuid}",
    tag = "requests",
    params(
        ("nuid" = String, Path, description = "Student identifier")
    ),
    responses(
        (status = 200, description = "Requests submitted under the identifier", body = NuidRequestsResponse),
        (status = 503, description = "Store unavailable", body = NuidRequestsResponse)
    )
)]
pub async fn requests_by_nuid(
    State(state): State<Arc<AppState>>,
    Path(nuid): Path<String>,
) -> (StatusCode, Json<NuidRequestsResponse>) {
    match state.requests.requests_by_nuid(&nuid).await {
        Ok(requests) => {
            tracing::info!(nuid = %nuid, count = requests.len(), "Retrieved student requests");
            (
                StatusCode::OK,
                Json(NuidRequestsResponse::from_store(nuid, requests)),
            )
        }
        Err(e) => {
            tracing::warn!(nuid = %nuid, error = %e, "Failed to fetch student requests");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(NuidRequestsResponse::unavailable(nuid, STORE_UNAVAILABLE)),
            )
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/requests/{id}/status",
    tag = "requests",
    params(
        ("id" = String, Path, description = "Request ID")
    ),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status accepted by the store", body = StatusUpdateResponse),
        (status = 400, description = "Body missing status", body = ErrorResponse),
        (status = 409, description = "Record changed since expectedUpdatedAt", body = ErrorResponse),
        (status = 502, description = "Store rejected the update", body = ErrorResponse),
        (status = 503, description = "Store unreachable", body = ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<StatusUpdate>,
) -> Result<Json<StatusUpdateResponse>, HttpAppError> {
    tracing::info!(
        request_id = %id,
        status = %update.status,
        credits = ?update.credits,
        updated_by = ?update.updated_by,
        "Updating request status"
    );

    state.requests.update_status(&id, &update).await?;

    Ok(Json(StatusUpdateResponse::accepted(id, update.status)))
}

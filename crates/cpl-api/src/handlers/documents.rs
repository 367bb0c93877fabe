use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    Json,
};
use cpl_backend::{BackendError, FetchMode};
use cpl_core::AppError;
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;

const PREVIEW_FALLBACK_CONTENT_TYPE: &str = "application/pdf";

/// Anything short of an unreachable backend means the document cannot be served.
fn document_error(err: BackendError) -> AppError {
    if err.is_unavailable() {
        AppError::from(err)
    } else {
        tracing::debug!(error = %err, "Backend could not serve document");
        AppError::NotFound("Document not found in object store".to_string())
    }
}

/// Quote-safe filename for Content-Disposition.
fn disposition(kind: &str, filename: &str) -> String {
    let safe: String = filename
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect();
    format!("{}; filename=\"{}\"", kind, safe)
}

async fn relay_document(
    state: &AppState,
    mode: FetchMode,
    document_id: &str,
    filename: &str,
) -> Result<Response<Body>, HttpAppError> {
    let document = state
        .documents
        .fetch(mode, document_id, filename)
        .await
        .map_err(document_error)?;

    let (content_type, content_disposition) = match mode {
        FetchMode::Download => (
            "application/octet-stream".to_string(),
            disposition("attachment", filename),
        ),
        FetchMode::Preview => (
            document
                .content_type
                .clone()
                .unwrap_or_else(|| PREVIEW_FALLBACK_CONTENT_TYPE.to_string()),
            disposition("inline", filename),
        ),
    };

    let body_stream = document.stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Backend stream error: {}", e)))
    });

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, content_disposition);
    if let Some(length) = document.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    let response = builder
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    tracing::info!(
        document_id = %document_id,
        filename = %filename,
        mode = %mode,
        "Document relayed"
    );
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/download-document/{document_id}/{filename}",
    tag = "documents",
    params(
        ("document_id" = String, Path, description = "Document ID"),
        ("filename" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "Document bytes as an attachment", content_type = "application/octet-stream"),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 503, description = "Backend unreachable", body = ErrorResponse)
    )
)]
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    Path((document_id, filename)): Path<(String, String)>,
) -> Result<Response<Body>, HttpAppError> {
    relay_document(&state, FetchMode::Download, &document_id, &filename).await
}

#[utoipa::path(
    get,
    path = "/api/preview-document/{document_id}/{filename}",
    tag = "documents",
    params(
        ("document_id" = String, Path, description = "Document ID"),
        ("filename" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "Document bytes for inline display"),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 503, description = "Backend unreachable", body = ErrorResponse)
    )
)]
pub async fn preview_document(
    State(state): State<Arc<AppState>>,
    Path((document_id, filename)): Path<(String, String)>,
) -> Result<Response<Body>, HttpAppError> {
    relay_document(&state, FetchMode::Preview, &document_id, &filename).await
}

#[utoipa::path(
    get,
    path = "/api/view-document/{document_id}/{filename}",
    tag = "documents",
    params(
        ("document_id" = String, Path, description = "Document ID"),
        ("filename" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "Document metadata from the object store", body = Object),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 503, description = "Backend unreachable", body = ErrorResponse)
    )
)]
pub async fn view_document(
    State(state): State<Arc<AppState>>,
    Path((document_id, filename)): Path<(String, String)>,
) -> Result<Json<Value>, HttpAppError> {
    let metadata = state
        .documents
        .describe(&document_id, &filename)
        .await
        .map_err(document_error)?;
    Ok(Json(metadata))
}

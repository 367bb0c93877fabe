use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use cpl_backend::DocumentUpload;
use cpl_core::{models::upload_response, AppError, UploadFields};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A body cut off by the request size limit is reported as 413; anything else is
/// a malformed form.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{}: {}", context, e.body_text()))
    } else {
        AppError::InvalidInput(format!("{}: {}", context, e))
    }
}

/// Read the multipart body into a document upload. Unknown fields are ignored and
/// missing metadata falls back to placeholders.
async fn read_upload(mut multipart: Multipart) -> Result<DocumentUpload, AppError> {
    let mut fields = UploadFields::default();
    let mut file: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if file.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            let file_name = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "document".to_string());
            let content_type = field.content_type().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read file data", e))?;
            file = Some((file_name, content_type, data));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| multipart_error("Failed to read field", e))?;
            fields.apply(&field_name, value);
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;

    Ok(DocumentUpload {
        file_name,
        content_type,
        data,
        fields,
    })
}

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document forwarded; backend result merged into the body", body = Object),
        (status = 400, description = "No file part", body = ErrorResponse),
        (status = 413, description = "Body exceeds MAX_REQUEST_BODY_BYTES", body = ErrorResponse),
        (status = 502, description = "Backend reported an error", body = ErrorResponse),
        (status = 503, description = "Backend unreachable", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Map<String, Value>>, HttpAppError> {
    let upload = read_upload(multipart).await?;
    let file_name = upload.file_name.clone();

    tracing::info!(
        file_name = %file_name,
        student = %upload.fields.student_name,
        nuid = %upload.fields.nuid,
        request_type = %upload.fields.request_type,
        target_course = %upload.fields.target_course,
        "Forwarding upload to backend"
    );

    let result = state.documents.upload(upload).await?;

    Ok(Json(upload_response(&file_name, result)))
}

//! Domain methods for the gateway client.
//!
//! Response envelopes are shared with the gateway through `cpl_core::models`.

use crate::ApiClient;
use anyhow::{Context, Result};
use bytes::Bytes;
use cpl_core::models::{
    NuidRequestsResponse, RequestListResponse, StatusUpdate, StatusUpdateResponse, UploadFields,
};
use reqwest::{header, StatusCode};
use serde_json::{Map, Value};

/// A document fetched through the gateway.
#[derive(Debug, Clone)]
pub struct DownloadedDocument {
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub data: Bytes,
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

impl ApiClient {
    /// Full request list. A 503 envelope (`source: "error"`) is returned as a value,
    /// not an error, so callers can tell "unreachable" from "empty".
    pub async fn list_requests(&self) -> Result<RequestListResponse> {
        self.get_envelope("/api/requests", &[StatusCode::SERVICE_UNAVAILABLE])
            .await
    }

    /// Requests filed under a student identifier, filtered by the store.
    pub async fn requests_by_nuid(&self, nuid: &str) -> Result<NuidRequestsResponse> {
        self.get_envelope(
            &format!("/api/requests-by-nuid/{}", encode(nuid)),
            &[StatusCode::SERVICE_UNAVAILABLE],
        )
        .await
    }

    pub async fn update_status(
        &self,
        request_id: &str,
        update: &StatusUpdate,
    ) -> Result<StatusUpdateResponse> {
        self.put_json(
            &format!("/api/requests/{}/status", encode(request_id)),
            update,
        )
        .await
    }

    /// Upload document bytes with student metadata.
    pub async fn upload_document(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Vec<u8>,
        fields: &UploadFields,
    ) -> Result<Map<String, Value>> {
        let mut part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        if let Some(content_type) = content_type {
            part = part
                .mime_str(content_type)
                .with_context(|| format!("Invalid content type: {}", content_type))?;
        }

        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields.form_fields() {
            form = form.text(name, value);
        }
        form = form.part("file", part);

        self.post_multipart("/api/upload", form).await
    }

    /// Upload a document from a local file path.
    pub async fn upload_file(
        &self,
        file_path: &str,
        content_type: Option<&str>,
        fields: &UploadFields,
    ) -> Result<Map<String, Value>> {
        let path = std::path::Path::new(file_path);
        if path
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(anyhow::anyhow!("Invalid input: {}", path.display()));
        }
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", file_path))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");

        self.upload_document(file_name, content_type, data, fields)
            .await
    }

    /// Fetch a stored document. `preview` selects inline rendering with the stored
    /// content type instead of an attachment.
    pub async fn fetch_document(
        &self,
        document_id: &str,
        filename: &str,
        preview: bool,
    ) -> Result<DownloadedDocument> {
        let route = if preview {
            "preview-document"
        } else {
            "download-document"
        };
        let response = self
            .get_raw(&format!(
                "/api/{}/{}/{}",
                route,
                encode(document_id),
                encode(filename)
            ))
            .await?;

        let header_text = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header_text(header::CONTENT_TYPE);
        let content_disposition = header_text(header::CONTENT_DISPOSITION);

        let data = response
            .bytes()
            .await
            .context("Failed to read document body")?;

        Ok(DownloadedDocument {
            content_type,
            content_disposition,
            data,
        })
    }

    /// Object store metadata of a document.
    pub async fn view_document(&self, document_id: &str, filename: &str) -> Result<Value> {
        self.get(&format!(
            "/api/view-document/{}/{}",
            encode(document_id),
            encode(filename)
        ))
        .await
    }

    /// Gateway capability descriptor.
    pub async fn health(&self) -> Result<Value> {
        self.get("/health").await
    }
}

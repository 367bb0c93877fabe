//! reqwest-backed implementation of the request and document stores.

use crate::traits::{
    BackendError, BackendResult, DocumentStore, DocumentStream, DocumentUpload, FetchMode,
    RequestStore,
};
use async_trait::async_trait;
use cpl_core::{Request, StatusUpdate};
use futures::TryStreamExt;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rows envelope returned by the request store's list endpoints.
#[derive(Debug, Deserialize)]
struct RowsEnvelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    requests: Vec<Request>,
    #[serde(default)]
    error: Option<String>,
}

/// Body of `PUT /api/update-status` on the backend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusBody<'a> {
    request_id: &'a str,
    status: &'a str,
    credits: Option<f64>,
    notes: Option<&'a str>,
    updated_by: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_updated_at: Option<&'a str>,
}

fn default_success() -> bool {
    true
}

/// HTTP client for the backend service.
///
/// No retries and no timeout beyond the client default; failures are classified and
/// returned to the caller as-is.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a backend URL from a route and percent-encoded path segments.
    fn url(&self, route: &str, segments: &[&str]) -> String {
        let mut url = format!("{}/api/{}", self.base_url, route);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    async fn fetch_rows(&self, url: &str) -> BackendResult<Vec<Request>> {
        let response = self.client.get(url).send().await?;
        let envelope: RowsEnvelope = read_json(ensure_success(response).await?).await?;

        if !envelope.success {
            return Err(BackendError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| "Request store query failed".to_string()),
            ));
        }
        Ok(envelope.requests)
    }
}

/// Turn a non-success response into `BackendError::Status`, keeping the backend's
/// `error` text when the body is a JSON envelope.
async fn ensure_success(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);

    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Malformed(e.to_string()))
}

/// Fail with `Rejected` when a 2xx JSON object carries `success: false`.
fn reject_unsuccessful(body: &Map<String, Value>, fallback: &str) -> BackendResult<()> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string();
        return Err(BackendError::Rejected(message));
    }
    Ok(())
}

#[async_trait]
impl RequestStore for HttpBackend {
    async fn list_requests(&self) -> BackendResult<Vec<Request>> {
        let url = self.url("get-requests", &[]);
        let requests = self.fetch_rows(&url).await?;
        tracing::debug!(count = requests.len(), "Fetched requests from store");
        Ok(requests)
    }

    async fn requests_by_nuid(&self, nuid: &str) -> BackendResult<Vec<Request>> {
        let url = self.url("get-requests-by-nuid", &[nuid]);
        let requests = self.fetch_rows(&url).await?;
        tracing::debug!(nuid = %nuid, count = requests.len(), "Fetched student requests");
        Ok(requests)
    }

    async fn update_status(&self, request_id: &str, update: &StatusUpdate) -> BackendResult<()> {
        let body = UpdateStatusBody {
            request_id,
            status: &update.status,
            credits: update.credits,
            notes: update.notes.as_deref(),
            updated_by: update.updated_by.as_deref(),
            expected_updated_at: update.expected_updated_at.as_deref(),
        };

        let response = self
            .client
            .put(self.url("update-status", &[]))
            .json(&body)
            .send()
            .await?;
        let ack: Map<String, Value> = read_json(ensure_success(response).await?).await?;
        reject_unsuccessful(&ack, "Status update was not applied")?;

        tracing::info!(
            request_id = %request_id,
            status = %update.status,
            "Request status updated in store"
        );
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for HttpBackend {
    async fn upload(&self, upload: DocumentUpload) -> BackendResult<Map<String, Value>> {
        let size = upload.data.len();
        let part = reqwest::multipart::Part::bytes(upload.data.to_vec())
            .file_name(upload.file_name.clone());
        let part = match upload.content_type.as_deref() {
            Some(content_type) => part.mime_str(content_type).map_err(|e| {
                BackendError::Malformed(format!("Invalid content type {}: {}", content_type, e))
            })?,
            None => part,
        };

        let mut form = reqwest::multipart::Form::new().part("file", part);
        for (name, value) in upload.fields.form_fields() {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(self.url("upload-to-watsonx", &[]))
            .multipart(form)
            .send()
            .await?;
        let body: Map<String, Value> = read_json(ensure_success(response).await?).await?;
        reject_unsuccessful(&body, "Upload failed")?;

        tracing::info!(
            file_name = %upload.file_name,
            size,
            nuid = %upload.fields.nuid,
            "Document forwarded to ingestion pipeline"
        );
        Ok(body)
    }

    async fn fetch(
        &self,
        mode: FetchMode,
        document_id: &str,
        filename: &str,
    ) -> BackendResult<DocumentStream> {
        let url = self.url(mode.route(), &[document_id, filename]);
        let response = ensure_success(self.client.get(url).send().await?).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();

        tracing::debug!(
            document_id = %document_id,
            filename = %filename,
            mode = %mode,
            "Relaying document from object store"
        );

        Ok(DocumentStream {
            content_type,
            content_length,
            stream: Box::pin(response.bytes_stream().map_err(BackendError::from)),
        })
    }

    async fn describe(&self, document_id: &str, filename: &str) -> BackendResult<Value> {
        let url = self.url("view-document", &[document_id, filename]);
        let response = ensure_success(self.client.get(url).send().await?).await?;
        let body: Map<String, Value> = read_json(response).await?;
        reject_unsuccessful(&body, "Document metadata unavailable")?;
        Ok(Value::Object(body))
    }
}

//! Shared HTTP client for the CPL gateway.
//!
//! Provides generic GET/PUT/POST helpers and domain methods (requests, status
//! updates, uploads, document retrieval). The tracker and the CLI use this client.

pub mod api;

use anyhow::{Context, Result};
use cpl_core::ClientConfig;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for the gateway.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.gateway_url.clone())
    }

    /// Create client from environment: CPL_GATEWAY_URL (or API_URL).
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.build_url(path))
            .send()
            .await
            .context("Failed to send request")?;
        parse_json(ensure_success(response).await?).await
    }

    /// GET request whose body is a typed envelope on success and on the listed
    /// failure statuses. Used by routes that report unavailability in-band.
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        envelope_statuses: &[StatusCode],
    ) -> Result<T> {
        let response = self
            .client
            .get(self.build_url(path))
            .send()
            .await
            .context("Failed to send request")?;

        if envelope_statuses.contains(&response.status()) {
            return parse_json(response).await;
        }
        parse_json(ensure_success(response).await?).await
    }

    /// PUT JSON body and deserialize response.
    pub async fn put_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .put(self.build_url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;
        parse_json(ensure_success(response).await?).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.build_url(path))
            .multipart(form)
            .send()
            .await
            .context("Failed to send request")?;
        parse_json(ensure_success(response).await?).await
    }

    /// GET returning the raw response after a status check.
    pub async fn get_raw(&self, path: &str) -> Result<Response> {
        let response = self
            .client
            .get(self.build_url(path))
            .send()
            .await
            .context("Failed to send request")?;
        ensure_success(response).await
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Fail on non-success, preferring the gateway's `error` text over the raw body.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<serde_json::Value>(&error_text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(error_text);

    Err(anyhow::anyhow!(
        "API request failed with status {}: {}",
        status,
        message
    ))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .context("Failed to parse response as JSON")
}

// Re-export domain types for convenience.
pub use api::DownloadedDocument;
pub use cpl_core::models::{
    NuidRequestsResponse, Request, RequestListResponse, StatusUpdate, StatusUpdateResponse,
    UploadFields,
};

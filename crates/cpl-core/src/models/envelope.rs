use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::request::Request;

/// Where a request list came from. `Error` means the store could not be reached,
/// which is distinct from the store answering with zero rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Iceberg,
    Error,
}

/// Response of `GET /api/requests`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestListResponse {
    pub success: bool,
    pub requests: Vec<Request>,
    pub count: usize,
    pub source: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestListResponse {
    pub fn from_store(requests: Vec<Request>) -> Self {
        Self {
            success: true,
            count: requests.len(),
            requests,
            source: DataSource::Iceberg,
            error: None,
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            success: false,
            requests: Vec::new(),
            count: 0,
            source: DataSource::Error,
            error: Some(error.into()),
        }
    }
}

/// Response of `GET /api/requests-by-nuid/{nuid}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NuidRequestsResponse {
    pub success: bool,
    pub requests: Vec<Request>,
    pub count: usize,
    pub nuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NuidRequestsResponse {
    pub fn from_store(nuid: impl Into<String>, requests: Vec<Request>) -> Self {
        Self {
            success: true,
            count: requests.len(),
            requests,
            nuid: nuid.into(),
            error: None,
        }
    }

    pub fn unavailable(nuid: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            requests: Vec::new(),
            count: 0,
            nuid: nuid.into(),
            error: Some(error.into()),
        }
    }
}

/// Body of `PUT /api/requests/{id}/status`.
///
/// Only `status` is required and its value is not checked here; the known set is
/// advisory and enforced by the tracker's form. `expected_updated_at` is an optional
/// concurrency token forwarded to the store, which rejects the write with 409 when
/// the record was modified since that timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: String,
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_updated_at: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            credits: None,
            notes: None,
            updated_by: None,
            expected_updated_at: None,
        }
    }
}

/// Acknowledgement returned after the store accepted a status update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub message: String,
    pub request_id: String,
    pub new_status: String,
}

impl StatusUpdateResponse {
    pub fn accepted(request_id: impl Into<String>, new_status: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "Status updated successfully".to_string(),
            request_id: request_id.into(),
            new_status: new_status.into(),
        }
    }
}

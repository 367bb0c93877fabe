use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Lifecycle status of a credit-evaluation request.
///
/// The wire carries statuses as plain strings so that values the store knows about
/// but this crate does not still pass through the gateway. This enum is the typed
/// view used by the tracker for labels, filters and form validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    Pending,
    UnderReview,
    Approved,
    Denied,
    RequiresInfo,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::UnderReview,
        RequestStatus::Approved,
        RequestStatus::Denied,
        RequestStatus::RequiresInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::UnderReview => "under-review",
            RequestStatus::Approved => "approved",
            RequestStatus::Denied => "denied",
            RequestStatus::RequiresInfo => "requires-info",
        }
    }

    /// Human readable label shown on status badges.
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending Review",
            RequestStatus::UnderReview => "Under Review",
            RequestStatus::Approved => "Approved",
            RequestStatus::Denied => "Denied",
            RequestStatus::RequiresInfo => "Requires Information",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "under-review" => Ok(RequestStatus::UnderReview),
            "approved" => Ok(RequestStatus::Approved),
            "denied" => Ok(RequestStatus::Denied),
            "requires-info" => Ok(RequestStatus::RequiresInfo),
            _ => Err(anyhow::anyhow!("Invalid request status: {}", s)),
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A student's prior-learning credit request as held by the request store.
///
/// Text columns can come back as SQL NULL, so they deserialize null as empty.
/// Fields the store returns that are not modelled here are kept in `extra` and
/// serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub student_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_course: String,
    #[serde(default = "default_status", deserialize_with = "null_as_pending")]
    pub status: String,
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub submitted_date: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default, alias = "updatedDate")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_status() -> String {
    RequestStatus::Pending.as_str().to_string()
}

fn null_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_pending<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_status))
}

impl Request {
    /// Typed status, `None` when the store holds a value outside the known set.
    pub fn known_status(&self) -> Option<RequestStatus> {
        self.status.parse().ok()
    }

    /// A request references at most one document, and only when both halves of the
    /// reference are present can it be fetched.
    pub fn has_document(&self) -> bool {
        matches!(
            (self.document_id.as_deref(), self.document_name.as_deref()),
            (Some(id), Some(name)) if !id.is_empty() && !name.is_empty()
        )
    }

    pub fn document_count(&self) -> usize {
        usize::from(self.has_document())
    }

    /// Advisor notes, `None` when absent or blank.
    pub fn visible_notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }
}

//! Student self-service lookup by NUID.

use cpl_core::display::{format_date, status_class, status_label, DateStyle};
use cpl_core::models::NOT_SPECIFIED;
use cpl_core::Request;
use serde::Serialize;

use crate::error::{TrackerError, TrackerResult};
use crate::gateway::TrackerGateway;

const COURSE_NOT_SPECIFIED: &str = "Course Not Specified";
const LOOKUP_FAILED: &str = "Error loading requests. Please try again later.";

/// Read-only card for one of the student's requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequestView {
    pub request_id: String,
    pub title: String,
    pub request_type: String,
    pub status_label: String,
    pub status_class: String,
    pub submitted: String,
    pub document_count: usize,
    pub credits_badge: Option<String>,
    pub feedback: Option<String>,
}

impl From<&Request> for StudentRequestView {
    fn from(request: &Request) -> Self {
        let or_placeholder = |value: &str, placeholder: &str| {
            if value.is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        };

        Self {
            request_id: request.id.clone(),
            title: or_placeholder(&request.target_course, COURSE_NOT_SPECIFIED),
            request_type: or_placeholder(&request.request_type, NOT_SPECIFIED),
            status_label: status_label(&request.status),
            status_class: status_class(&request.status),
            submitted: format_date(request.submitted_date.as_deref(), DateStyle::Long),
            document_count: request.document_count(),
            credits_badge: request.credits.map(|c| format!("{} Credits", c)),
            feedback: request.visible_notes().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudentLookup {
    nuid: Option<String>,
    requests: Vec<Request>,
}

impl StudentLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nuid(&self) -> Option<&str> {
        self.nuid.as_deref()
    }

    /// Look up the requests filed under `nuid`. The identifier is trimmed and an
    /// empty one is rejected without a network call.
    pub async fn lookup<G>(&mut self, gateway: &G, nuid: &str) -> TrackerResult<usize>
    where
        G: TrackerGateway + ?Sized,
    {
        let nuid = nuid.trim();
        if nuid.is_empty() {
            return Err(TrackerError::EmptyNuid);
        }

        self.nuid = Some(nuid.to_string());
        self.requests.clear();

        let response = gateway.requests_by_nuid(nuid).await.map_err(|e| {
            tracing::error!(error = %e, nuid = %nuid, "Request lookup failed");
            TrackerError::Unavailable(LOOKUP_FAILED.to_string())
        })?;
        if !response.success {
            tracing::warn!(nuid = %nuid, error = ?response.error, "Request store unavailable");
            return Err(TrackerError::Unavailable(LOOKUP_FAILED.to_string()));
        }

        tracing::debug!(nuid = %nuid, count = response.count, "Found requests");
        self.requests = response.requests;
        Ok(self.requests.len())
    }

    /// Name shown above the list, taken from the first match.
    pub fn student_name(&self) -> Option<&str> {
        self.requests
            .first()
            .map(|r| r.student_name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn views(&self) -> Vec<StudentRequestView> {
        self.requests.iter().map(StudentRequestView::from).collect()
    }

    /// Return to the lookup form.
    pub fn reset(&mut self) {
        self.nuid = None;
        self.requests.clear();
    }
}

//! Advisor dashboard: full request list, filters and the status update form.

use cpl_api_client::DownloadedDocument;
use cpl_core::display::{format_date, status_class, status_label, truncate_notes, DateStyle};
use cpl_core::{DataSource, Request, StatusUpdate};
use serde::Serialize;

use crate::error::{TrackerError, TrackerResult};
use crate::filter::RequestFilter;
use crate::gateway::TrackerGateway;
use crate::notice::Notice;

const STORE_UNAVAILABLE: &str =
    "Request store connection unavailable. Please check backend services.";
const STORE_UNREACHABLE: &str =
    "Unable to connect to the request store. Please ensure backend services are running.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    NotLoaded,
    Ready,
    Unavailable(String),
}

/// Editable copy of a request's review fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusForm {
    pub request_id: String,
    pub status: String,
    pub credits: Option<f64>,
    pub notes: String,
    /// `updatedAt` of the record when the form was opened; sent as the concurrency
    /// token so a stale form is rejected instead of overwriting a newer review.
    pub expected_updated_at: Option<String>,
}

impl StatusForm {
    fn for_request(request: &Request) -> Self {
        Self {
            request_id: request.id.clone(),
            status: request.status.clone(),
            credits: request.credits,
            notes: request.notes.clone().unwrap_or_default(),
            expected_updated_at: request.updated_at.clone(),
        }
    }

    fn to_update(&self, advisor_name: &str) -> StatusUpdate {
        StatusUpdate {
            credits: self.credits,
            notes: Some(self.notes.trim().to_string()),
            updated_by: Some(advisor_name.to_string()),
            expected_updated_at: self.expected_updated_at.clone(),
            ..StatusUpdate::new(self.status.trim())
        }
    }
}

/// One line of the advisor table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRow {
    pub id: String,
    pub student_name: String,
    pub nuid: String,
    pub request_type: String,
    pub target_course: String,
    pub status_label: String,
    pub status_class: String,
    pub submitted: String,
    pub notes_preview: Option<String>,
    pub document_name: Option<String>,
}

impl From<&Request> for RequestRow {
    fn from(request: &Request) -> Self {
        Self {
            id: request.id.clone(),
            student_name: request.student_name.clone(),
            nuid: request.nuid.clone(),
            request_type: request.request_type.clone(),
            target_course: request.target_course.clone(),
            status_label: status_label(&request.status),
            status_class: status_class(&request.status),
            submitted: format_date(request.submitted_date.as_deref(), DateStyle::Short),
            notes_preview: request.visible_notes().map(truncate_notes),
            document_name: request
                .has_document()
                .then(|| request.document_name.clone())
                .flatten(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdvisorDashboard {
    advisor_name: String,
    requests: Vec<Request>,
    state: DashboardState,
    pub filter: RequestFilter,
    form: Option<StatusForm>,
}

impl AdvisorDashboard {
    pub fn new(advisor_name: impl Into<String>) -> Self {
        Self {
            advisor_name: advisor_name.into(),
            requests: Vec::new(),
            state: DashboardState::NotLoaded,
            filter: RequestFilter::default(),
            form: None,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn open_form(&self) -> Option<&StatusForm> {
        self.form.as_ref()
    }

    /// Fetch the full list. Anything other than a successful list from the request
    /// store leaves the dashboard `Unavailable` with no rows.
    pub async fn load<G>(&mut self, gateway: &G) -> TrackerResult<usize>
    where
        G: TrackerGateway + ?Sized,
    {
        match gateway.list_requests().await {
            Ok(listing) if listing.success && listing.source == DataSource::Iceberg => {
                tracing::debug!(count = listing.count, "Loaded requests");
                self.requests = listing.requests;
                self.state = DashboardState::Ready;
                Ok(self.requests.len())
            }
            Ok(listing) => {
                tracing::warn!(
                    source = ?listing.source,
                    error = ?listing.error,
                    "Request list not served by the store"
                );
                Err(self.mark_unavailable(STORE_UNAVAILABLE))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load requests");
                Err(self.mark_unavailable(STORE_UNREACHABLE))
            }
        }
    }

    fn mark_unavailable(&mut self, message: &str) -> TrackerError {
        self.requests.clear();
        self.state = DashboardState::Unavailable(message.to_string());
        TrackerError::Unavailable(message.to_string())
    }

    pub fn filtered(&self) -> Vec<&Request> {
        self.filter.apply(&self.requests)
    }

    pub fn rows(&self) -> Vec<RequestRow> {
        self.filtered().into_iter().map(RequestRow::from).collect()
    }

    fn find(&self, request_id: &str) -> TrackerResult<&Request> {
        self.requests
            .iter()
            .find(|r| r.id == request_id)
            .ok_or_else(|| TrackerError::RequestNotFound(request_id.to_string()))
    }

    /// Open the status form for a request, pre-filled with its current review.
    pub fn open(&mut self, request_id: &str) -> TrackerResult<StatusForm> {
        let form = StatusForm::for_request(self.find(request_id)?);
        self.form = Some(form.clone());
        Ok(form)
    }

    pub fn close(&mut self) {
        self.form = None;
    }

    /// Send the form. An empty status is rejected locally. On success the form is
    /// closed and the whole list is fetched again.
    pub async fn submit<G>(&mut self, gateway: &G, form: &StatusForm) -> TrackerResult<Notice>
    where
        G: TrackerGateway + ?Sized,
    {
        if form.status.trim().is_empty() {
            return Err(TrackerError::MissingStatus);
        }

        let update = form.to_update(&self.advisor_name);
        let ack = gateway
            .update_status(&form.request_id, &update)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to update status: {}", e))?;

        tracing::info!(
            request_id = %ack.request_id,
            status = %ack.new_status,
            "Status updated"
        );

        self.close();
        if let Err(e) = self.load(gateway).await {
            tracing::warn!(error = %e, "Reload after status update failed");
        }
        Ok(Notice::success("Status updated successfully"))
    }

    /// Download the document attached to a request.
    pub async fn download<G>(
        &self,
        gateway: &G,
        request_id: &str,
    ) -> TrackerResult<DownloadedDocument>
    where
        G: TrackerGateway + ?Sized,
    {
        self.fetch(gateway, request_id, false).await
    }

    /// Fetch the document attached to a request for inline display.
    pub async fn preview<G>(
        &self,
        gateway: &G,
        request_id: &str,
    ) -> TrackerResult<DownloadedDocument>
    where
        G: TrackerGateway + ?Sized,
    {
        self.fetch(gateway, request_id, true).await
    }

    async fn fetch<G>(
        &self,
        gateway: &G,
        request_id: &str,
        preview: bool,
    ) -> TrackerResult<DownloadedDocument>
    where
        G: TrackerGateway + ?Sized,
    {
        let request = self.find(request_id)?;
        let (Some(document_id), Some(document_name)) = (
            request.document_id.as_deref().filter(|_| request.has_document()),
            request.document_name.as_deref(),
        ) else {
            return Err(TrackerError::NoDocument(request_id.to_string()));
        };

        let document = gateway
            .fetch_document(document_id, document_name, preview)
            .await?;
        Ok(document)
    }
}

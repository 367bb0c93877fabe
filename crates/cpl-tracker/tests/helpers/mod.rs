//! Shared fakes for tracker integration tests.
//!
//! The gateway fake keeps requests in memory and counts every call so tests can
//! assert that client-side rejections never reach the network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cpl_api_client::DownloadedDocument;
use cpl_core::{
    NuidRequestsResponse, Request, RequestListResponse, StatusUpdate, StatusUpdateResponse,
    UploadFields,
};
use cpl_tracker::{Assistant, OutboundMessage, TrackerGateway};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
    pub fields: UploadFields,
}

#[derive(Default)]
struct State {
    requests: Vec<Request>,
    unreachable: bool,
    wrong_source: bool,
    fail_uploads: bool,
    updates: Vec<(String, StatusUpdate)>,
    uploads: Vec<RecordedUpload>,
    fetches: Vec<(String, String, bool)>,
}

#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<State>,
    calls: AtomicUsize,
    clock: AtomicUsize,
}

impl FakeGateway {
    pub fn with_requests(requests: Vec<Request>) -> Self {
        let gateway = Self::default();
        gateway.state.lock().unwrap().requests = requests;
        gateway
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    pub fn set_wrong_source(&self, wrong_source: bool) {
        self.state.lock().unwrap().wrong_source = wrong_source;
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.state.lock().unwrap().fail_uploads = fail;
    }

    /// Simulate another advisor changing a record behind our back.
    pub fn touch(&self, request_id: &str) {
        let stamp = self.tick();
        let mut state = self.state.lock().unwrap();
        if let Some(r) = state.requests.iter_mut().find(|r| r.id == request_id) {
            r.updated_at = Some(stamp);
        }
    }

    pub fn updates(&self) -> Vec<(String, StatusUpdate)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn fetches(&self) -> Vec<(String, String, bool)> {
        self.state.lock().unwrap().fetches.clone()
    }

    fn tick(&self) -> String {
        let n = self.clock.fetch_add(1, Ordering::SeqCst);
        format!("2025-02-01T10:00:{:02}", n)
    }

    fn record_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.state.lock().unwrap().unreachable {
            return Err(anyhow!("Failed to send request"));
        }
        Ok(())
    }
}

#[async_trait]
impl TrackerGateway for FakeGateway {
    async fn list_requests(&self) -> Result<RequestListResponse> {
        self.record_call()?;
        let state = self.state.lock().unwrap();
        if state.wrong_source {
            return Ok(RequestListResponse::unavailable("Request store unavailable"));
        }
        Ok(RequestListResponse::from_store(state.requests.clone()))
    }

    async fn requests_by_nuid(&self, nuid: &str) -> Result<NuidRequestsResponse> {
        self.record_call()?;
        let state = self.state.lock().unwrap();
        if state.wrong_source {
            return Ok(NuidRequestsResponse::unavailable(
                nuid,
                "Request store unavailable",
            ));
        }
        let matches = state
            .requests
            .iter()
            .filter(|r| r.nuid == nuid)
            .cloned()
            .collect();
        Ok(NuidRequestsResponse::from_store(nuid, matches))
    }

    async fn update_status(
        &self,
        request_id: &str,
        update: &StatusUpdate,
    ) -> Result<StatusUpdateResponse> {
        self.record_call()?;
        let stamp = self.tick();
        let mut state = self.state.lock().unwrap();
        state.updates.push((request_id.to_string(), update.clone()));

        let request = state
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| {
                anyhow!("API request failed with status 404 Not Found: Request not found")
            })?;

        if let Some(expected) = &update.expected_updated_at {
            if request.updated_at.as_ref() != Some(expected) {
                return Err(anyhow!(
                    "API request failed with status 409 Conflict: Record was modified"
                ));
            }
        }

        request.status = update.status.clone();
        request.credits = update.credits;
        request.notes = update.notes.clone();
        request.updated_by = update.updated_by.clone();
        request.updated_at = Some(stamp);

        Ok(StatusUpdateResponse::accepted(request_id, &update.status))
    }

    async fn upload_document(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Vec<u8>,
        fields: &UploadFields,
    ) -> Result<Map<String, Value>> {
        self.record_call()?;
        let mut state = self.state.lock().unwrap();
        if state.fail_uploads {
            return Err(anyhow!("API request failed with status 502 Bad Gateway: upstream"));
        }
        state.uploads.push(RecordedUpload {
            file_name: file_name.to_string(),
            content_type: content_type.map(str::to_string),
            size: data.len(),
            fields: fields.clone(),
        });

        let receipt = json!({
            "success": true,
            "fileName": file_name,
            "analysisResult": format!("Extracted text of {}", file_name),
            "document_id": format!("doc-{}", state.uploads.len()),
        });
        Ok(receipt.as_object().cloned().unwrap_or_default())
    }

    async fn fetch_document(
        &self,
        document_id: &str,
        filename: &str,
        preview: bool,
    ) -> Result<DownloadedDocument> {
        self.record_call()?;
        self.state.lock().unwrap().fetches.push((
            document_id.to_string(),
            filename.to_string(),
            preview,
        ));
        let content_type = if preview {
            "application/pdf"
        } else {
            "application/octet-stream"
        };
        Ok(DownloadedDocument {
            content_type: Some(content_type.to_string()),
            content_disposition: None,
            data: bytes_of(filename),
        })
    }
}

fn bytes_of(filename: &str) -> bytes::Bytes {
    bytes::Bytes::from(format!("contents of {}", filename))
}

/// Assistant fake that records outbound messages.
#[derive(Default)]
pub struct FakeAssistant {
    sent: Mutex<Vec<OutboundMessage>>,
    fail: bool,
}

impl FakeAssistant {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Assistant for FakeAssistant {
    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        if self.fail {
            return Err(anyhow!("assistant offline"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn request(id: &str, student: &str, nuid: &str, course: &str, status: &str) -> Request {
    serde_json::from_value(json!({
        "id": id,
        "studentName": student,
        "nuid": nuid,
        "requestType": "Experience-based waiver",
        "targetCourse": course,
        "status": status,
        "submittedDate": "2025-01-10T09:30:00",
        "updatedAt": "2025-01-10T09:30:00"
    }))
    .unwrap()
}

pub fn with_document(mut request: Request, document_id: &str, name: &str) -> Request {
    request.document_id = Some(document_id.to_string());
    request.document_name = Some(name.to_string());
    request
}

pub fn sample_requests() -> Vec<Request> {
    vec![
        request("REQ1", "Ada Lovelace", "001234567", "CS 5001", "pending"),
        request("REQ2", "Grace Hopper", "002345678", "PJM 5900", "under-review"),
        request("REQ3", "Ada Lovelace", "001234567", "CS 5010", "approved"),
    ]
}

//! Test helpers: in-memory backend stores and a router wired to them.
//!
//! Run from workspace root: `cargo test -p cpl-api`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use cpl_api::setup::routes;
use cpl_api::state::AppState;
use cpl_backend::{
    BackendError, BackendResult, DocumentStore, DocumentStream, DocumentUpload, FetchMode,
    RequestStore,
};
use cpl_core::{GatewayConfig, Request, StatusUpdate};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Backend stand-in holding request rows and documents in memory.
///
/// `set_available(false)` makes every call fail as if the backend were unreachable.
#[derive(Default)]
pub struct InMemoryBackend {
    requests: Mutex<Vec<Request>>,
    documents: Mutex<HashMap<(String, String), (Option<String>, Bytes)>>,
    uploads: Mutex<Vec<DocumentUpload>>,
    unavailable: AtomicBool,
    clock: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn insert_request(&self, request: Request) {
        self.requests.lock().unwrap().push(request);
    }

    pub fn insert_document(
        &self,
        document_id: &str,
        filename: &str,
        content_type: Option<&str>,
        data: &'static [u8],
    ) {
        self.documents.lock().unwrap().insert(
            (document_id.to_string(), filename.to_string()),
            (content_type.map(str::to_string), Bytes::from_static(data)),
        );
    }

    pub fn uploads(&self) -> Vec<DocumentUpload> {
        self.uploads.lock().unwrap().clone()
    }

    fn check_available(&self) -> BackendResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn tick(&self) -> String {
        let n = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        format!("2025-02-01T10:00:{:02}", n)
    }
}

#[async_trait]
impl RequestStore for InMemoryBackend {
    async fn list_requests(&self) -> BackendResult<Vec<Request>> {
        self.check_available()?;
        Ok(self.requests.lock().unwrap().clone())
    }

    async fn requests_by_nuid(&self, nuid: &str) -> BackendResult<Vec<Request>> {
        self.check_available()?;
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.nuid == nuid)
            .cloned()
            .collect())
    }

    async fn update_status(&self, request_id: &str, update: &StatusUpdate) -> BackendResult<()> {
        self.check_available()?;
        let now = self.tick();
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| BackendError::Rejected(format!("Unknown request {}", request_id)))?;

        if let Some(expected) = &update.expected_updated_at {
            if request.updated_at.as_ref() != Some(expected) {
                return Err(BackendError::Status {
                    status: 409,
                    message: "Record was modified".to_string(),
                });
            }
        }

        request.status = update.status.clone();
        request.credits = update.credits;
        request.notes = update.notes.clone();
        request.updated_by = update.updated_by.clone();
        request.updated_at = Some(now);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryBackend {
    async fn upload(&self, upload: DocumentUpload) -> BackendResult<Map<String, Value>> {
        self.check_available()?;
        let document_id = format!("doc-{}", self.uploads.lock().unwrap().len() + 1);
        let body = json!({
            "success": true,
            "document_id": document_id,
            "filename": upload.file_name,
            "nuid": upload.fields.nuid,
            "cos_key": format!("{}/{}", document_id, upload.file_name),
        });
        self.uploads.lock().unwrap().push(upload);
        Ok(body.as_object().cloned().unwrap_or_default())
    }

    async fn fetch(
        &self,
        _mode: FetchMode,
        document_id: &str,
        filename: &str,
    ) -> BackendResult<DocumentStream> {
        self.check_available()?;
        let documents = self.documents.lock().unwrap();
        let (content_type, data) = documents
            .get(&(document_id.to_string(), filename.to_string()))
            .cloned()
            .ok_or_else(|| BackendError::Status {
                status: 500,
                message: "NoSuchKey".to_string(),
            })?;

        Ok(DocumentStream {
            content_type,
            content_length: Some(data.len() as u64),
            stream: Box::pin(futures::stream::iter(vec![Ok(data)])),
        })
    }

    async fn describe(&self, document_id: &str, filename: &str) -> BackendResult<Value> {
        self.check_available()?;
        let documents = self.documents.lock().unwrap();
        let (_, data) = documents
            .get(&(document_id.to_string(), filename.to_string()))
            .ok_or_else(|| BackendError::Rejected("NoSuchKey".to_string()))?;
        Ok(json!({
            "success": true,
            "document_id": document_id,
            "filename": filename,
            "size": data.len(),
            "metadata": {}
        }))
    }
}

pub fn test_config() -> GatewayConfig {
    GatewayConfig::from_lookup(|key| match key {
        "SERVICE_NAME" => Some("CPL Gateway".to_string()),
        _ => None,
    })
    .expect("default config")
}

/// A stored request row as the store would return it.
pub fn request(id: &str, student: &str, nuid: &str, status: &str) -> Request {
    serde_json::from_value(json!({
        "id": id,
        "studentName": student,
        "nuid": nuid,
        "requestType": "Experience-based waiver",
        "targetCourse": "PJM 5900",
        "status": status,
        "submittedDate": "2025-01-10T09:30:00",
        "updatedDate": "2025-01-10T09:30:00",
        "documentId": format!("doc-{}", id),
        "documentName": "transcript.pdf"
    }))
    .expect("valid request row")
}

/// Test application: server plus a handle on the backend it talks to.
pub struct TestApp {
    pub server: TestServer,
    pub backend: Arc<InMemoryBackend>,
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config())
}

pub fn setup_test_app_with(config: GatewayConfig) -> TestApp {
    let backend = InMemoryBackend::new();
    let state = Arc::new(AppState::new(config, backend.clone(), backend.clone()));
    let app = routes::setup_routes(state).expect("Failed to build routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp { server, backend }
}

//! Upload queue and assistant hand-off integration tests.
//!
//! Run with: `cargo test -p cpl-tracker --test uploads_test`

mod helpers;

use cpl_tracker::{SelectedFile, StudentContext, TrackerError, UploadQueue, UploadStatus};
use helpers::{FakeAssistant, FakeGateway};
use serde_json::json;

fn pdf(name: &str, size: usize) -> SelectedFile {
    SelectedFile {
        name: name.to_string(),
        content_type: "application/pdf".to_string(),
        data: vec![b'%'; size],
    }
}

fn student() -> StudentContext {
    StudentContext {
        name: Some("Ada Lovelace".to_string()),
        nuid: Some("001234567".to_string()),
        request_type: Some("Portfolio review".to_string()),
        target_course: Some("CS 5001".to_string()),
    }
}

#[tokio::test]
async fn test_disallowed_type_makes_no_call() {
    let gateway = FakeGateway::default();
    let mut queue = UploadQueue::new();

    let err = queue
        .add(SelectedFile {
            name: "archive.zip".to_string(),
            content_type: "application/zip".to_string(),
            data: vec![0; 64],
        })
        .unwrap_err();
    let notices = queue.upload_pending(&gateway, &student()).await;

    assert!(matches!(err, TrackerError::Validation(_)));
    assert!(err.notice().is_error());
    assert!(notices.is_empty());
    assert!(queue.files().is_empty());
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_oversized_file_makes_no_call() {
    let gateway = FakeGateway::default();
    let mut queue = UploadQueue::new();

    let err = queue.add(pdf("huge.pdf", 10 * 1024 * 1024 + 1)).unwrap_err();
    queue.upload_pending(&gateway, &student()).await;

    assert_eq!(err.to_string(), "File size must be less than 10MB");
    assert!(queue.files().is_empty());
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_two_megabyte_pdf_scenario() {
    let gateway = FakeGateway::default();
    let assistant = FakeAssistant::default();
    let mut queue = UploadQueue::new();

    let id = queue.add(pdf("transcript.pdf", 2 * 1024 * 1024)).unwrap();
    assert_eq!(queue.get(&id).unwrap().status, UploadStatus::Pending);
    assert!(!queue.can_send());

    let notices = queue.upload_pending(&gateway, &student()).await;

    assert_eq!(gateway.calls(), 1);
    assert_eq!(notices[0].message, "Uploading transcript.pdf...");
    assert_eq!(
        notices[1].message,
        "transcript.pdf ready - Click button to send"
    );
    let file = queue.get(&id).unwrap();
    assert_eq!(file.status, UploadStatus::Ready);
    assert_eq!(file.document_id.as_deref(), Some("doc-1"));
    assert!(queue.can_send());

    let upload = &gateway.uploads()[0];
    assert_eq!(upload.size, 2 * 1024 * 1024);
    assert_eq!(upload.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(upload.fields.nuid, "001234567");
    assert_eq!(upload.fields.target_course, "CS 5001");
    assert_eq!(upload.fields.file_id.as_deref(), Some(id.as_str()));

    let notice = queue.send(&assistant).await.unwrap();

    assert_eq!(notice.message, "Sent 1 file(s)");
    assert!(queue.files().is_empty());
    assert!(!queue.can_send());

    let sent = assistant.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "Uploaded 1 document(s) for evaluation");
    assert_eq!(sent[0].skill_variables["file_name"], json!("transcript.pdf"));
    assert_eq!(
        sent[0].skill_variables["file_text"],
        json!("Extracted text of transcript.pdf")
    );
    assert_eq!(sent[0].skill_variables["file_size"], json!(2 * 1024 * 1024));
}

#[tokio::test]
async fn test_failed_upload_marks_error_and_blocks_send() {
    let gateway = FakeGateway::default();
    gateway.set_fail_uploads(true);
    let assistant = FakeAssistant::default();
    let mut queue = UploadQueue::new();

    let id = queue.add(pdf("cv.pdf", 1024)).unwrap();
    let notices = queue.upload_pending(&gateway, &StudentContext::default()).await;

    assert_eq!(notices[1].message, "Failed: cv.pdf");
    assert_eq!(queue.get(&id).unwrap().status, UploadStatus::Error);

    let err = queue.send(&assistant).await.unwrap_err();
    assert!(matches!(err, TrackerError::FilesNotReady));
    assert!(assistant.sent().is_empty());
    assert_eq!(queue.files().len(), 1);
}

#[tokio::test]
async fn test_send_counts_ready_files_only() {
    let gateway = FakeGateway::default();
    let assistant = FakeAssistant::default();
    let mut queue = UploadQueue::new();

    queue.add(pdf("a.pdf", 10)).unwrap();
    queue.add(pdf("b.pdf", 20)).unwrap();
    queue.upload_pending(&gateway, &student()).await;
    queue.add(pdf("c.pdf", 30)).unwrap();

    let notice = queue.send(&assistant).await.unwrap();

    assert_eq!(
        assistant.sent()[0].text,
        "Uploaded 2 document(s) for evaluation"
    );
    assert_eq!(assistant.sent()[0].skill_variables["file_name"], json!("a.pdf"));
    assert_eq!(notice.message, "Sent 3 file(s)");
}

#[tokio::test]
async fn test_assistant_failure_keeps_queue() {
    let gateway = FakeGateway::default();
    let assistant = FakeAssistant::failing();
    let mut queue = UploadQueue::new();

    queue.add(pdf("a.pdf", 10)).unwrap();
    queue.upload_pending(&gateway, &student()).await;

    let err = queue.send(&assistant).await.unwrap_err();

    assert!(err.notice().is_error());
    assert!(err.to_string().starts_with("Failed to send files"));
    assert_eq!(queue.files().len(), 1);
    assert!(queue.can_send());
}

#[tokio::test]
async fn test_remove_hides_file() {
    let gateway = FakeGateway::default();
    let mut queue = UploadQueue::new();

    let id = queue.add(pdf("a.pdf", 10)).unwrap();
    let notice = queue.remove(&id);
    queue.upload_pending(&gateway, &student()).await;

    assert_eq!(notice.message, "File removed");
    assert!(queue.get(&id).is_none());
    assert_eq!(gateway.calls(), 0);
}

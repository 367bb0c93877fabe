//! Document upload queue feeding the assistant conversation.
//!
//! Each file moves `pending -> uploading -> ready | error`. Files are validated
//! before they enter the queue, so a rejected file never causes a network call.
//! Transfers are split into [`UploadQueue::begin`] and [`UploadQueue::complete`];
//! removing a file between the two hides it but does not cancel the transfer.

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use cpl_core::{UploadFields, UploadValidator};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::assistant::{Assistant, OutboundMessage};
use crate::context::StudentContext;
use crate::error::{TrackerError, TrackerResult};
use crate::gateway::TrackerGateway;
use crate::notice::Notice;

const NO_TEXT_EXTRACTED: &str = "No text extracted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Ready,
    Error,
}

/// A file chosen by the student, before validation.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub status: UploadStatus,
    pub analysis_result: Option<String>,
    pub document_id: Option<String>,
}

/// A transfer that has left the queue and is running against the gateway.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub file_id: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub fields: UploadFields,
}

impl UploadJob {
    pub async fn run<G>(self, gateway: &G) -> Result<Map<String, Value>>
    where
        G: TrackerGateway + ?Sized,
    {
        gateway
            .upload_document(
                &self.file_name,
                Some(&self.content_type),
                self.data,
                &self.fields,
            )
            .await
    }
}

#[derive(Debug, Default)]
pub struct UploadQueue {
    validator: UploadValidator,
    files: Vec<UploadedFile>,
    payloads: HashMap<String, Vec<u8>>,
}

fn new_file_id() -> String {
    format!(
        "{}-{:06}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>() % 1_000_000
    )
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn get(&self, file_id: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.id == file_id)
    }

    pub fn ready_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == UploadStatus::Ready)
            .count()
    }

    /// The send action is offered only once at least one file is ready.
    pub fn can_send(&self) -> bool {
        self.ready_count() > 0
    }

    /// Validate and enqueue a file as `pending`. A rejected file leaves the queue
    /// untouched.
    pub fn add(&mut self, file: SelectedFile) -> TrackerResult<String> {
        let size = file.data.len() as u64;
        self.validator.validate(&file.content_type, size)?;

        let id = new_file_id();
        self.files.push(UploadedFile {
            id: id.clone(),
            name: file.name,
            size,
            content_type: file.content_type,
            status: UploadStatus::Pending,
            analysis_result: None,
            document_id: None,
        });
        self.payloads.insert(id.clone(), file.data);
        Ok(id)
    }

    /// Move a pending file to `uploading` and hand out its transfer.
    pub fn begin(&mut self, file_id: &str, context: &StudentContext) -> Option<UploadJob> {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.id == file_id && f.status == UploadStatus::Pending)?;
        let data = self.payloads.remove(file_id)?;
        file.status = UploadStatus::Uploading;

        let mut fields = context.upload_fields();
        fields.file_id = Some(file.id.clone());

        Some(UploadJob {
            file_id: file.id.clone(),
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            data,
            fields,
        })
    }

    /// Record the outcome of a transfer. Files removed in the meantime stay
    /// removed and the outcome is dropped.
    pub fn complete(&mut self, file_id: &str, outcome: Result<Map<String, Value>>) -> Notice {
        let Some(file) = self.files.iter_mut().find(|f| f.id == file_id) else {
            tracing::debug!(file_id = %file_id, "Upload finished for a removed file");
            return match outcome {
                Ok(_) => Notice::info("Upload finished for a removed file"),
                Err(_) => Notice::info("Upload failed for a removed file"),
            };
        };

        match outcome {
            Ok(result) => {
                file.status = UploadStatus::Ready;
                file.analysis_result = result
                    .get("analysisResult")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                file.document_id = result
                    .get("document_id")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                tracing::info!(
                    file_id = %file.id,
                    document_id = ?file.document_id,
                    "Upload ready"
                );
                Notice::success(format!("{} ready - Click button to send", file.name))
            }
            Err(e) => {
                file.status = UploadStatus::Error;
                tracing::error!(file_id = %file.id, error = %e, "Upload failed");
                Notice::error(format!("Failed: {}", file.name))
            }
        }
    }

    /// Upload every pending file in order, one round trip each.
    pub async fn upload_pending<G>(
        &mut self,
        gateway: &G,
        context: &StudentContext,
    ) -> Vec<Notice>
    where
        G: TrackerGateway + ?Sized,
    {
        let pending: Vec<String> = self
            .files
            .iter()
            .filter(|f| f.status == UploadStatus::Pending)
            .map(|f| f.id.clone())
            .collect();

        let mut notices = Vec::new();
        for file_id in pending {
            let Some(job) = self.begin(&file_id, context) else {
                continue;
            };
            notices.push(Notice::info(format!("Uploading {}...", job.file_name)));
            let outcome = job.run(gateway).await;
            notices.push(self.complete(&file_id, outcome));
        }
        notices
    }

    /// Hide a file. An in-flight transfer for it is left to finish.
    pub fn remove(&mut self, file_id: &str) -> Notice {
        self.files.retain(|f| f.id != file_id);
        self.payloads.remove(file_id);
        Notice::success("File removed")
    }

    /// Message handed to the assistant: the ready count plus the first queued
    /// file's name, extracted text and size.
    pub fn outbound_message(&self) -> TrackerResult<OutboundMessage> {
        let first = self.files.first().ok_or(TrackerError::NoFiles)?;
        let ready = self.ready_count();
        if ready == 0 {
            return Err(TrackerError::FilesNotReady);
        }

        let mut skill_variables = Map::new();
        skill_variables.insert("file_name".to_string(), Value::from(first.name.clone()));
        skill_variables.insert(
            "file_text".to_string(),
            Value::from(
                first
                    .analysis_result
                    .clone()
                    .unwrap_or_else(|| NO_TEXT_EXTRACTED.to_string()),
            ),
        );
        skill_variables.insert("file_size".to_string(), Value::from(first.size));

        Ok(OutboundMessage {
            text: format!("Uploaded {} document(s) for evaluation", ready),
            skill_variables,
        })
    }

    /// Hand the queue to the assistant. The queue is cleared only when the
    /// assistant accepted the message.
    pub async fn send<A>(&mut self, assistant: &A) -> TrackerResult<Notice>
    where
        A: Assistant + ?Sized,
    {
        let message = self.outbound_message()?;
        assistant.send(&message).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to send files to the assistant");
            TrackerError::Gateway(e.context("Failed to send files"))
        })?;

        let sent = self.files.len();
        self.files.clear();
        self.payloads.clear();
        Ok(Notice::success(format!("Sent {} file(s)", sent)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_file(name: &str) -> SelectedFile {
        SelectedFile {
            name: name.to_string(),
            content_type: "text/plain".to_string(),
            data: b"hello".to_vec(),
        }
    }

    #[test]
    fn test_add_rejects_without_state_change() {
        let mut queue = UploadQueue::new();
        let err = queue
            .add(SelectedFile {
                name: "run.exe".to_string(),
                content_type: "application/x-msdownload".to_string(),
                data: vec![0; 16],
            })
            .unwrap_err();

        assert_eq!(
            err.notice().message,
            "Please upload PDF, Word, Text, or Image files only"
        );
        assert!(queue.files().is_empty());
    }

    #[test]
    fn test_ids_are_distinct() {
        let mut queue = UploadQueue::new();
        let a = queue.add(text_file("a.txt")).unwrap();
        let b = queue.add(text_file("b.txt")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut queue = UploadQueue::new();
        let id = queue.add(text_file("notes.txt")).unwrap();
        assert_eq!(queue.get(&id).unwrap().status, UploadStatus::Pending);

        let job = queue.begin(&id, &StudentContext::default()).unwrap();
        assert_eq!(job.fields.file_id.as_deref(), Some(id.as_str()));
        assert_eq!(queue.get(&id).unwrap().status, UploadStatus::Uploading);
        assert!(queue.begin(&id, &StudentContext::default()).is_none());
        assert!(!queue.can_send());

        let receipt = json!({"document_id": "doc-7"});
        let notice = queue.complete(&id, Ok(receipt.as_object().unwrap().clone()));
        assert_eq!(notice.message, "notes.txt ready - Click button to send");
        let file = queue.get(&id).unwrap();
        assert_eq!(file.status, UploadStatus::Ready);
        assert_eq!(file.document_id.as_deref(), Some("doc-7"));
        assert!(queue.can_send());
    }

    #[test]
    fn test_failed_transfer_marks_error() {
        let mut queue = UploadQueue::new();
        let id = queue.add(text_file("notes.txt")).unwrap();
        queue.begin(&id, &StudentContext::default()).unwrap();

        let notice = queue.complete(&id, Err(anyhow::anyhow!("boom")));
        assert!(notice.is_error());
        assert_eq!(queue.get(&id).unwrap().status, UploadStatus::Error);
        assert!(!queue.can_send());
    }

    #[test]
    fn test_remove_during_transfer_keeps_file_hidden() {
        let mut queue = UploadQueue::new();
        let id = queue.add(text_file("notes.txt")).unwrap();
        let job = queue.begin(&id, &StudentContext::default()).unwrap();

        queue.remove(&id);
        queue.complete(&job.file_id, Ok(Map::new()));

        assert!(queue.files().is_empty());
    }

    #[test]
    fn test_outbound_message_uses_first_file() {
        let mut queue = UploadQueue::new();
        let first = queue.add(text_file("first.txt")).unwrap();
        let second = queue.add(text_file("second.txt")).unwrap();

        assert!(matches!(
            queue.outbound_message(),
            Err(TrackerError::FilesNotReady)
        ));

        queue.begin(&second, &StudentContext::default()).unwrap();
        let receipt = json!({"analysisResult": "indexed"});
        queue.complete(&second, Ok(receipt.as_object().unwrap().clone()));

        let message = queue.outbound_message().unwrap();
        assert_eq!(message.text, "Uploaded 1 document(s) for evaluation");
        assert_eq!(message.skill_variables["file_name"], json!("first.txt"));
        assert_eq!(message.skill_variables["file_text"], json!("No text extracted"));
        assert_eq!(message.skill_variables["file_size"], json!(5));
        assert_eq!(queue.get(&first).unwrap().status, UploadStatus::Pending);
    }

    #[test]
    fn test_empty_queue_has_nothing_to_send() {
        assert!(matches!(
            UploadQueue::new().outbound_message(),
            Err(TrackerError::NoFiles)
        ));
    }
}

//! Helpers for the `cpl` binary: tracing setup, local file I/O and the stdout
//! assistant used by `upload --send`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use cpl_api_client::DownloadedDocument;
use cpl_core::display::{format_size, FileKind};
use cpl_tracker::{Assistant, OutboundMessage, SelectedFile, StudentContext, UploadedFile};
use serde::Serialize;
use serde_json::{Map, Value};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// MIME type guessed from the file extension. Unknown extensions map to
/// `application/octet-stream`, which upload validation rejects.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Read a local file into an upload candidate.
pub fn read_selected_file(path: &Path) -> Result<SelectedFile> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    Ok(SelectedFile {
        name,
        content_type: content_type_for(path).to_string(),
        data,
    })
}

/// Upload queue entry as printed by `cpl upload`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary<'a> {
    #[serde(flatten)]
    pub file: &'a UploadedFile,
    pub size_label: String,
    pub kind: &'static str,
}

impl<'a> From<&'a UploadedFile> for FileSummary<'a> {
    fn from(file: &'a UploadedFile) -> Self {
        Self {
            file,
            size_label: format_size(file.size),
            kind: FileKind::from_content_type(&file.content_type).as_str(),
        }
    }
}

/// Build the upload context from assistant skill variables (a JSON object) and
/// explicit flags. Flags win over skill variables.
pub fn upload_context(
    skill_variables: Option<&str>,
    flags: StudentContext,
) -> Result<StudentContext> {
    let mut context = StudentContext::default();
    if let Some(raw) = skill_variables {
        let variables: Map<String, Value> =
            serde_json::from_str(raw).context("Skill variables must be a JSON object")?;
        context.update_from_skill_variables(&variables);
    }

    Ok(StudentContext {
        name: flags.name.or(context.name),
        nuid: flags.nuid.or(context.nuid),
        request_type: flags.request_type.or(context.request_type),
        target_course: flags.target_course.or(context.target_course),
    })
}

/// Write a fetched document to `out`, or to `filename` in the current directory.
/// Only the final path component of `filename` is used.
pub fn save_document(
    document: &DownloadedDocument,
    filename: &str,
    out: Option<&Path>,
) -> Result<PathBuf> {
    let target = match out {
        Some(path) => path.to_path_buf(),
        None => {
            let name = Path::new(filename)
                .file_name()
                .context("Document filename has no final component")?;
            PathBuf::from(name)
        }
    };
    std::fs::write(&target, &document.data)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(target)
}

/// Assistant stand-in for the terminal: prints the outbound message.
pub struct StdoutAssistant;

#[async_trait]
impl Assistant for StdoutAssistant {
    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        print_json(message)
    }
}

//! CPL CLI: command-line client for the CPL portal gateway.
//!
//! Set CPL_GATEWAY_URL (or API_URL) and optionally CPL_ADVISOR_NAME.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cpl_api_client::ApiClient;
use cpl_cli::{
    init_tracing, print_json, read_selected_file, save_document, upload_context, FileSummary,
    StdoutAssistant,
};
use cpl_core::{ClientConfig, StatusUpdate};
use cpl_tracker::{
    AdvisorDashboard, RequestFilter, StudentContext, StudentLookup, UploadQueue, ALL_STATUSES,
};
use serde_json::json;

#[derive(Parser)]
#[command(name = "cpl", about = "CPL portal gateway CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List requests as the advisor dashboard shows them
    Requests {
        /// Case-insensitive search over student, NUID, course and request type
        #[arg(long, default_value = "")]
        search: String,
        /// Exact status, or "all"
        #[arg(long, default_value = ALL_STATUSES)]
        status: String,
    },
    /// Show a student's requests by NUID
    Lookup {
        nuid: String,
    },
    /// Update a request's review status
    Update {
        /// Request ID
        id: String,
        #[arg(long)]
        status: String,
        #[arg(long)]
        credits: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
        /// Reviewer name (defaults to CPL_ADVISOR_NAME)
        #[arg(long)]
        by: Option<String>,
        /// Reject the update if the record changed since this timestamp
        #[arg(long)]
        expected_updated_at: Option<String>,
    },
    /// Upload documents and optionally hand them to the assistant
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        student_name: Option<String>,
        #[arg(long)]
        nuid: Option<String>,
        #[arg(long)]
        request_type: Option<String>,
        #[arg(long)]
        target_course: Option<String>,
        /// Assistant skill variables as a JSON object; explicit flags take precedence
        #[arg(long)]
        skill_variables: Option<String>,
        /// Print the assistant message once files are ready
        #[arg(long)]
        send: bool,
    },
    /// Download a stored document
    Download {
        /// Document ID
        document_id: String,
        /// Stored filename
        filename: String,
        /// Output path (defaults to the filename in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Fetch the inline preview instead of the attachment
        #[arg(long)]
        preview: bool,
    },
    /// Show the gateway capability descriptor
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ClientConfig::from_env();
    let client = ApiClient::from_config(&config)
        .context("Failed to create API client. Set CPL_GATEWAY_URL (or API_URL)")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Requests { search, status } => {
            let mut dashboard = AdvisorDashboard::new(config.advisor_name.clone());
            dashboard.load(&client).await?;
            dashboard.filter = RequestFilter::new(search, status);
            print_json(&dashboard.rows())?;
        }
        Commands::Lookup { nuid } => {
            let mut lookup = StudentLookup::new();
            lookup.lookup(&client, &nuid).await?;
            print_json(&json!({
                "nuid": lookup.nuid(),
                "studentName": lookup.student_name(),
                "requests": lookup.views(),
            }))?;
        }
        Commands::Update {
            id,
            status,
            credits,
            notes,
            by,
            expected_updated_at,
        } => {
            if status.trim().is_empty() {
                anyhow::bail!("Please select a status");
            }
            let update = StatusUpdate {
                credits,
                notes,
                updated_by: Some(by.unwrap_or_else(|| config.advisor_name.clone())),
                expected_updated_at,
                ..StatusUpdate::new(status.trim())
            };
            let response = client.update_status(&id, &update).await?;
            print_json(&response)?;
        }
        Commands::Upload {
            files,
            student_name,
            nuid,
            request_type,
            target_course,
            skill_variables,
            send,
        } => {
            let flags = StudentContext {
                name: student_name,
                nuid,
                request_type,
                target_course,
            };
            let context = upload_context(skill_variables.as_deref(), flags)?;

            let mut queue = UploadQueue::new();
            for path in &files {
                let selected = read_selected_file(path)?;
                if let Err(e) = queue.add(selected) {
                    tracing::warn!(file = %path.display(), error = %e, "Skipping file");
                }
            }

            let notices = queue.upload_pending(&client, &context).await;
            let files: Vec<FileSummary> = queue.files().iter().map(FileSummary::from).collect();
            print_json(&json!({ "files": files, "notices": notices }))?;

            if send {
                let notice = queue.send(&StdoutAssistant).await?;
                print_json(&notice)?;
            }
        }
        Commands::Download {
            document_id,
            filename,
            out,
            preview,
        } => {
            let document = client
                .fetch_document(&document_id, &filename, preview)
                .await?;
            let path = save_document(&document, &filename, out.as_deref())?;
            print_json(&json!({
                "path": path.display().to_string(),
                "bytes": document.data.len(),
                "contentType": document.content_type,
            }))?;
        }
        Commands::Health => {
            let response = client.health().await?;
            print_json(&response)?;
        }
    }

    Ok(())
}

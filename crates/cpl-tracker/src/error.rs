use cpl_core::ValidationError;
use thiserror::Error;

use crate::notice::Notice;

/// Client-side failures. Validation variants are raised before any network call.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{}", .0.user_message())]
    Validation(#[from] ValidationError),

    #[error("Please enter your NUID")]
    EmptyNuid,

    #[error("Please select a status")]
    MissingStatus,

    #[error("Request not found: {0}")]
    RequestNotFound(String),

    #[error("No document attached to request {0}")]
    NoDocument(String),

    #[error("No files to send")]
    NoFiles,

    #[error("Please wait for files to finish uploading")]
    FilesNotReady,

    #[error("{0}")]
    Unavailable(String),

    #[error("{0:#}")]
    Gateway(#[from] anyhow::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

impl TrackerError {
    /// True when the failure was caught locally and nothing was sent.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            TrackerError::Validation(_)
                | TrackerError::EmptyNuid
                | TrackerError::MissingStatus
                | TrackerError::RequestNotFound(_)
                | TrackerError::NoDocument(_)
                | TrackerError::NoFiles
                | TrackerError::FilesNotReady
        )
    }

    pub fn notice(&self) -> Notice {
        match self {
            TrackerError::FilesNotReady => Notice::info(self.to_string()),
            _ => Notice::error(self.to_string()),
        }
    }
}

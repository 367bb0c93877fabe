/// Content types accepted for evaluation documents.
pub const ALLOWED_CONTENT_TYPES: [&str; 7] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "image/jpeg",
    "image/jpg",
    "image/png",
];

/// Largest document the upload widget will send (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Client-side upload validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },
}

impl ValidationError {
    /// Message shown to the user in a notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::FileTooLarge { .. } => "File size must be less than 10MB",
            ValidationError::InvalidContentType { .. } => {
                "Please upload PDF, Word, Text, or Image files only"
            }
        }
    }
}

/// Upload validator
///
/// Runs before any network call so that rejected files never leave the client.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: u64,
    allowed_content_types: Vec<String>,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(
            MAX_UPLOAD_BYTES,
            ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl UploadValidator {
    pub fn new(max_file_size: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.trim().to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Type is checked before size, matching the order the user sees errors in.
    pub fn validate(&self, content_type: &str, size: u64) -> Result<(), ValidationError> {
        self.validate_content_type(content_type)?;
        self.validate_file_size(size)
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub const UNKNOWN_STUDENT: &str = "Unknown";
pub const UNKNOWN_NUID: &str = "N/A";
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Fixed message merged into every successful upload response.
pub const ANALYSIS_RESULT_MESSAGE: &str =
    "File uploaded to the assistant index, the search index and the object store";

/// Student metadata sent alongside an uploaded document.
///
/// Missing or empty fields fall back to placeholders; nothing else is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFields {
    pub student_name: String,
    pub nuid: String,
    pub request_type: String,
    pub target_course: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl Default for UploadFields {
    fn default() -> Self {
        Self {
            student_name: UNKNOWN_STUDENT.to_string(),
            nuid: UNKNOWN_NUID.to_string(),
            request_type: NOT_SPECIFIED.to_string(),
            target_course: NOT_SPECIFIED.to_string(),
            file_id: None,
        }
    }
}

impl UploadFields {
    /// Apply a multipart text field by its form name. Returns false for names that
    /// are not upload metadata so the caller can ignore them.
    pub fn apply(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "studentName" => &mut self.student_name,
            "nuid" => &mut self.nuid,
            "requestType" => &mut self.request_type,
            "targetCourse" => &mut self.target_course,
            "fileId" => {
                self.file_id = Some(value).filter(|v| !v.is_empty());
                return true;
            }
            _ => return false,
        };
        if !value.is_empty() {
            *slot = value;
        }
        true
    }

    /// Form fields in the order the document backend expects them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("studentName", self.student_name.clone()),
            ("nuid", self.nuid.clone()),
            ("requestType", self.request_type.clone()),
            ("targetCourse", self.target_course.clone()),
        ];
        if let Some(file_id) = &self.file_id {
            fields.push(("fileId", file_id.clone()));
        }
        fields
    }
}

/// Build the `POST /api/upload` success body: the backend's result with the
/// gateway's fixed `success`, `fileName` and `analysisResult` keys on top.
pub fn upload_response(file_name: &str, backend: Map<String, Value>) -> Map<String, Value> {
    let mut body = backend;
    body.insert("success".to_string(), Value::Bool(true));
    body.insert("fileName".to_string(), Value::String(file_name.to_string()));
    body.insert(
        "analysisResult".to_string(),
        Value::String(ANALYSIS_RESULT_MESSAGE.to_string()),
    );
    body
}

use cpl_core::UploadFields;
use serde_json::{Map, Value};

/// Student details collected by the assistant conversation and attached to every
/// upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentContext {
    pub name: Option<String>,
    pub nuid: Option<String>,
    pub request_type: Option<String>,
    pub target_course: Option<String>,
}

impl StudentContext {
    /// Merge skill variables received from the assistant. Only non-empty string
    /// values overwrite what is already known.
    pub fn update_from_skill_variables(&mut self, variables: &Map<String, Value>) {
        let read = |key: &str| {
            variables
                .get(key)
                .and_then(Value::as_str)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(name) = read("student_name") {
            self.name = Some(name);
        }
        if let Some(nuid) = read("nuid") {
            self.nuid = Some(nuid);
        }
        if let Some(request_type) = read("request_type") {
            self.request_type = Some(request_type);
        }
        if let Some(target_course) = read("target_course") {
            self.target_course = Some(target_course);
        }
    }

    /// Upload metadata; unknown fields keep the gateway placeholders.
    pub fn upload_fields(&self) -> UploadFields {
        let mut fields = UploadFields::default();
        let known = [
            ("studentName", &self.name),
            ("nuid", &self.nuid),
            ("requestType", &self.request_type),
            ("targetCourse", &self.target_course),
        ];
        for (name, value) in known {
            if let Some(value) = value {
                fields.apply(name, value.clone());
            }
        }
        fields
    }
}

use cpl_core::Request;

/// Status filter value that matches every request.
pub const ALL_STATUSES: &str = "all";

/// Advisor list filter: free-text search AND exact status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFilter {
    pub search: String,
    pub status: String,
}

impl Default for RequestFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: ALL_STATUSES.to_string(),
        }
    }
}

impl RequestFilter {
    pub fn new(search: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            status: status.into(),
        }
    }

    pub fn matches(&self, request: &Request) -> bool {
        self.matches_search(request) && self.matches_status(request)
    }

    /// Apply to the full list. The result is always derived from `requests`, never
    /// from a previous result.
    pub fn apply<'a>(&self, requests: &'a [Request]) -> Vec<&'a Request> {
        requests.iter().filter(|r| self.matches(r)).collect()
    }

    fn matches_search(&self, request: &Request) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            &request.student_name,
            &request.nuid,
            &request.target_course,
            &request.request_type,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_status(&self, request: &Request) -> bool {
        self.status.is_empty() || self.status == ALL_STATUSES || request.status == self.status
    }
}

//! Presentation helpers shared by the tracker views and the CLI.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::RequestStatus;

/// Badge label for a wire status; unknown values are shown as-is.
pub fn status_label(status: &str) -> String {
    status
        .parse::<RequestStatus>()
        .map(|s| s.label().to_string())
        .unwrap_or_else(|_| status.to_string())
}

/// CSS modifier class for a status badge, e.g. `status-under-review`.
pub fn status_class(status: &str) -> String {
    format!("status-{}", status)
}

/// Human readable size using binary units, one decimal place, capped at MB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 3] = ["B", "KB", "MB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Truncate to `max` characters, appending `...` when anything was cut.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Note previews in the advisor table are cut at 50 characters.
pub fn truncate_notes(notes: &str) -> String {
    truncate_text(notes, 50)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Word,
    Image,
    Text,
    Other,
}

impl FileKind {
    pub fn from_content_type(content_type: &str) -> Self {
        let ct = content_type.to_lowercase();
        if ct.contains("pdf") {
            FileKind::Pdf
        } else if ct.contains("word") {
            FileKind::Word
        } else if ct.starts_with("image/") {
            FileKind::Image
        } else if ct.starts_with("text/") {
            FileKind::Text
        } else {
            FileKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Word => "word",
            FileKind::Image => "image",
            FileKind::Text => "text",
            FileKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Jan 5, 2025`, used by the advisor dashboard
    Short,
    /// `January 5, 2025`, used by the student view
    Long,
}

/// Format a store timestamp for display.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]` (space separator too) and
/// bare dates. Absent or blank input yields `Unknown`; anything unparsable is
/// returned verbatim.
pub fn format_date(value: Option<&str>, style: DateStyle) -> String {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return "Unknown".to_string();
    };

    match parse_date(raw) {
        Some(date) => {
            let pattern = match style {
                DateStyle::Short => "%b %-d, %Y",
                DateStyle::Long => "%B %-d, %Y",
            };
            date.format(pattern).to_string()
        }
        None => raw.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

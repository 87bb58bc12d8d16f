//! iCalendar rendering for meetings
//!
//! Produces a minimal RFC 5545 VCALENDAR with a single VEVENT, enough for
//! calendar apps to import a meeting. Timestamps are UTC.

use chrono::{DateTime, Duration, Utc};

/// The fields of a meeting that end up in its calendar file
#[derive(Debug, Clone)]
pub struct IcsEvent {
    /// Stable unique identifier for the event
    pub uid: String,
    pub summary: String,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub location: String,
    pub description: String,
    /// Cancelled meetings export with STATUS:CANCELLED
    pub cancelled: bool,
}

impl IcsEvent {
    /// Render the full VCALENDAR text (CRLF line endings)
    #[must_use]
    pub fn render(&self) -> String {
        let ends_at = self.starts_at + Duration::minutes(i64::from(self.duration_minutes));
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Chapter//Meeting//EN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", format_utc(Utc::now())),
            format!("DTSTART:{}", format_utc(self.starts_at)),
            format!("DTEND:{}", format_utc(ends_at)),
            format!("SUMMARY:{}", escape_text(&self.summary)),
        ];
        if !self.location.is_empty() {
            lines.push(format!("LOCATION:{}", escape_text(&self.location)));
        }
        if !self.description.is_empty() {
            lines.push(format!("DESCRIPTION:{}", escape_text(&self.description)));
        }
        lines.push(format!(
            "STATUS:{}",
            if self.cancelled { "CANCELLED" } else { "CONFIRMED" }
        ));
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }
}

fn format_utc(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}

/// RFC 5545 TEXT escaping: backslash, comma, semicolon, newline
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

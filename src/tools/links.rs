//! Intent-link builders
//!
//! Template-based URLs that open "create" flows in Google Calendar and
//! Drive. These are plain links; no API call is made.

/// Build a Google Calendar event-creation link.
///
/// `start`/`end` are compact ISO 8601 stamps (YYYYMMDDTHHMMSSZ) passed
/// through unencoded as the template expects.
pub fn calendar_event_url(
    title: &str,
    start: &str,
    end: &str,
    details: Option<&str>,
    location: Option<&str>,
) -> String {
    format!(
        "https://calendar.google.com/calendar/render?action=TEMPLATE&text={}&dates={}/{}&details={}&location={}",
        urlencoding::encode(title),
        start,
        end,
        urlencoding::encode(details.unwrap_or("")),
        urlencoding::encode(location.unwrap_or("")),
    )
}

/// Kind of Drive document to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveDocKind {
    Document,
    Spreadsheet,
    Presentation,
}

impl DriveDocKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "spreadsheet" => DriveDocKind::Spreadsheet,
            "presentation" => DriveDocKind::Presentation,
            _ => DriveDocKind::Document,
        }
    }
}

/// Build a Google Drive document-creation link.
pub fn drive_create_url(kind: DriveDocKind) -> String {
    match kind {
        DriveDocKind::Document => "https://docs.google.com/document/create".to_string(),
        DriveDocKind::Spreadsheet => "https://docs.google.com/spreadsheets/create".to_string(),
        DriveDocKind::Presentation => "https://docs.google.com/presentation/create".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_url_encodes_fields() {
        let url = calendar_event_url(
            "Design Review & Sync",
            "20260810T100000Z",
            "20260810T110000Z",
            Some("Bring the specs"),
            Some("Room 3"),
        );
        assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
        assert!(url.contains("text=Design%20Review%20%26%20Sync"));
        assert!(url.contains("dates=20260810T100000Z/20260810T110000Z"));
        assert!(url.contains("details=Bring%20the%20specs"));
        assert!(url.contains("location=Room%203"));
    }

    #[test]
    fn test_calendar_url_optional_fields_empty() {
        let url = calendar_event_url("Standup", "20260810T100000Z", "20260810T101500Z", None, None);
        assert!(url.contains("details=&location="));
    }

    #[test]
    fn test_drive_kinds() {
        assert_eq!(
            drive_create_url(DriveDocKind::parse("document")),
            "https://docs.google.com/document/create"
        );
        assert_eq!(
            drive_create_url(DriveDocKind::parse("spreadsheet")),
            "https://docs.google.com/spreadsheets/create"
        );
        assert_eq!(
            drive_create_url(DriveDocKind::parse("presentation")),
            "https://docs.google.com/presentation/create"
        );
        // Unknown kinds fall back to a document
        assert_eq!(
            drive_create_url(DriveDocKind::parse("mindmap")),
            "https://docs.google.com/document/create"
        );
    }
}

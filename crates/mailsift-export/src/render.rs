//! Top-level rendering: table building plus byte-format serialization.

use mailsift_session::Message;
use tracing::debug;

use crate::error::Result;
use crate::{csv, fields, sheet};

/// Target byte format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Delimited text (RFC 4180 style CSV).
    Csv,
    /// SpreadsheetML 2003 workbook (single-file XML Excel opens directly).
    Spreadsheet,
}

impl ExportFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Spreadsheet => "xls",
        }
    }

    /// Default export file name ("emails" plus the format's extension).
    #[must_use]
    pub fn default_file_name(self) -> String {
        format!("emails.{}", self.extension())
    }
}

/// Renders the selected fields of `messages` to a byte buffer in `format`.
///
/// # Errors
///
/// [`crate::ExportError::NoMessages`] / [`crate::ExportError::NoFields`]
/// when either input list is empty.
pub fn render(messages: &[Message], fields: &[String], format: ExportFormat) -> Result<Vec<u8>> {
    let table = fields::rows(messages, fields)?;
    let bytes = match format {
        ExportFormat::Csv => csv::to_bytes(&table),
        ExportFormat::Spreadsheet => sheet::to_bytes(&table),
    };
    debug!(
        messages = messages.len(),
        columns = fields.len(),
        bytes = bytes.len(),
        ?format,
        "export rendered"
    );
    Ok(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn messages() -> Vec<Message> {
        vec![Message {
            subject: "Invoice".into(),
            from: "billing@example.com".into(),
            to: "a@example.com".into(),
            date: Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
            body_preview: "attached".into(),
        }]
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ExportFormat::Csv.default_file_name(), "emails.csv");
        assert_eq!(ExportFormat::Spreadsheet.default_file_name(), "emails.xls");
    }

    #[test]
    fn test_render_csv() {
        let fields = vec!["subject".to_owned(), "date".to_owned()];
        let bytes = render(&messages(), &fields, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Subject,Date\r\nInvoice,2024-01-02 09:00:00\r\n");
    }

    #[test]
    fn test_render_spreadsheet() {
        let fields = vec!["subject".to_owned()];
        let bytes = render(&messages(), &fields, ExportFormat::Spreadsheet).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.contains("<Data ss:Type=\"String\">Invoice</Data>"));
    }
}

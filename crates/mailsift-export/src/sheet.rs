//! Spreadsheet serialization.
//!
//! Emits a SpreadsheetML 2003 workbook: a single XML file Excel and
//! LibreOffice open directly, with no zip container. One worksheet, every
//! cell typed as a string.

/// Worksheet name shown in the spreadsheet application.
const SHEET_NAME: &str = "Messages";

/// Serializes the table to SpreadsheetML workbook bytes.
pub(crate) fn to_bytes(rows: &[Vec<String>]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n");
    out.push_str("<?mso-application progid=\"Excel.Sheet\"?>\r\n");
    out.push_str(
        "<Workbook xmlns=\"urn:schemas-microsoft-com:office:spreadsheet\" \
         xmlns:ss=\"urn:schemas-microsoft-com:office:spreadsheet\">\r\n",
    );
    out.push_str(&format!(" <Worksheet ss:Name=\"{SHEET_NAME}\">\r\n"));
    out.push_str("  <Table>\r\n");
    for row in rows {
        out.push_str("   <Row>\r\n");
        for cell in row {
            out.push_str("    <Cell><Data ss:Type=\"String\">");
            push_escaped(&mut out, cell);
            out.push_str("</Data></Cell>\r\n");
        }
        out.push_str("   </Row>\r\n");
    }
    out.push_str("  </Table>\r\n");
    out.push_str(" </Worksheet>\r\n");
    out.push_str("</Workbook>\r\n");
    out.into_bytes()
}

/// Appends text with XML character escaping.
fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(rows: &[Vec<String>]) -> String {
        String::from_utf8(to_bytes(rows)).unwrap()
    }

    #[test]
    fn test_workbook_skeleton() {
        let rows = vec![vec!["Subject".to_owned()], vec!["hello".to_owned()]];
        let xml = render(&rows);

        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("<?mso-application progid=\"Excel.Sheet\"?>"));
        assert!(xml.contains("<Worksheet ss:Name=\"Messages\">"));
        assert_eq!(xml.matches("<Row>").count(), 2);
        assert!(xml.contains("<Data ss:Type=\"String\">hello</Data>"));
        assert!(xml.trim_end().ends_with("</Workbook>"));
    }

    #[test]
    fn test_cells_are_escaped() {
        let rows = vec![vec!["a<b & \"c\"".to_owned()]];
        let xml = render(&rows);
        assert!(xml.contains("a&lt;b &amp; &quot;c&quot;"));
        assert!(!xml.contains("a<b"));
    }

    #[test]
    fn test_column_counts_match_input() {
        let rows = vec![vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]];
        let xml = render(&rows);
        assert_eq!(xml.matches("<Cell>").count(), 3);
    }
}

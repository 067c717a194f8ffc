//! Delimited-text serialization (RFC 4180 style).

/// Serializes the table to CSV bytes: comma-delimited, CRLF row endings,
/// fields quoted only when they need it.
pub(crate) fn to_bytes(rows: &[Vec<String>]) -> Vec<u8> {
    let mut out = String::new();
    for row in rows {
        let mut first = true;
        for cell in row {
            if !first {
                out.push(',');
            }
            first = false;
            push_field(&mut out, cell);
        }
        out.push_str("\r\n");
    }
    out.into_bytes()
}

/// Appends one field, quoting when it contains a delimiter, quote, or line
/// break. Embedded quotes are doubled.
fn push_field(out: &mut String, cell: &str) {
    let needs_quoting = cell.contains([',', '"', '\r', '\n']);
    if needs_quoting {
        out.push('"');
        for c in cell.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(cell);
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
    fn test_plain_rows() {
        let rows = vec![
            vec!["Subject".to_owned(), "Sender".to_owned()],
            vec!["hello".to_owned(), "a@example.com".to_owned()],
        ];
        assert_eq!(render(&rows), "Subject,Sender\r\nhello,a@example.com\r\n");
    }

    #[test]
    fn test_comma_forces_quoting() {
        let rows = vec![vec!["a,b".to_owned(), "plain".to_owned()]];
        assert_eq!(render(&rows), "\"a,b\",plain\r\n");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let rows = vec![vec!["say \"hi\"".to_owned()]];
        assert_eq!(render(&rows), "\"say \"\"hi\"\"\"\r\n");
    }

    #[test]
    fn test_newline_in_field_stays_inside_quotes() {
        let rows = vec![vec!["line1\nline2".to_owned()]];
        assert_eq!(render(&rows), "\"line1\nline2\"\r\n");
    }

    #[test]
    fn test_empty_field() {
        let rows = vec![vec![String::new(), "x".to_owned()]];
        assert_eq!(render(&rows), ",x\r\n");
    }
}

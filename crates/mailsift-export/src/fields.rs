//! Export field resolution and row building.
//!
//! Four well-known fields get fixed header labels; anything else passes
//! through with the field identifier as its label and an empty value when
//! the message record has nothing to offer.

use chrono::{DateTime, Utc};
use mailsift_session::Message;

use crate::error::{ExportError, Result};

/// Header label for a field identifier.
#[must_use]
pub fn header_label(field: &str) -> &str {
    match field {
        "subject" => "Subject",
        "from" => "Sender",
        "to" => "Recipient",
        "date" => "Date",
        other => other,
    }
}

/// Resolves a field's value from a message record.
fn field_value(message: &Message, field: &str) -> String {
    match field {
        "subject" => message.subject.clone(),
        "from" => message.from.clone(),
        "to" => message.to.clone(),
        "date" => format_date(message.date),
        "body_preview" => message.body_preview.clone(),
        _ => String::new(),
    }
}

/// Human-readable timestamp for spreadsheet cells.
fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Builds the export table: one header row followed by one row per message,
/// with columns in the order of `fields`.
///
/// # Errors
///
/// [`ExportError::NoMessages`] / [`ExportError::NoFields`] when either input
/// list is empty.
pub fn rows(messages: &[Message], fields: &[String]) -> Result<Vec<Vec<String>>> {
    if messages.is_empty() {
        return Err(ExportError::NoMessages);
    }
    if fields.is_empty() {
        return Err(ExportError::NoFields);
    }

    let mut table = Vec::with_capacity(messages.len() + 1);
    table.push(
        fields
            .iter()
            .map(|field| header_label(field).to_owned())
            .collect(),
    );
    for message in messages {
        table.push(
            fields
                .iter()
                .map(|field| field_value(message, field))
                .collect(),
        );
    }
    Ok(table)
}

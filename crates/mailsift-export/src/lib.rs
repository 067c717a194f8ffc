//! # mailsift-export
//!
//! Tabular export of mailbox search results.
//!
//! Given a non-empty list of message records and a non-empty list of field
//! identifiers, this crate renders a byte buffer in one of two formats and
//! persists it through exactly one of two sinks:
//!
//! - **Formats**: delimited text (CSV) or a SpreadsheetML 2003 workbook
//!   (single-file XML that Excel opens directly)
//! - **Sinks**: a host-provided save dialog ([`SavePrompt`]) or a direct
//!   download into a fixed directory ([`DownloadSink`])
//!
//! Four well-known fields carry fixed header labels (subject → Subject,
//! from → Sender, to → Recipient, date → Date as a human-readable
//! timestamp); other field identifiers pass through as their own label.
//!
//! A user cancelling the save dialog is a non-error outcome
//! ([`ExportOutcome::Cancelled`]); everything that actually fails is an
//! [`ExportError`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsift_export::{render, DownloadSink, ExportFormat};
//!
//! let fields = vec!["subject".to_owned(), "from".to_owned(), "date".to_owned()];
//! let bytes = render(&messages, &fields, ExportFormat::Csv)?;
//!
//! let sink = DownloadSink::new();
//! let outcome = sink.save(&bytes, &ExportFormat::Csv.default_file_name()).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod csv;
mod error;
pub mod fields;
mod render;
mod sheet;
pub mod sink;

pub use error::{ExportError, Result};
pub use fields::{header_label, rows};
pub use render::{ExportFormat, render};
pub use sink::{DownloadSink, ExportOutcome, SavePrompt, save_with_prompt};

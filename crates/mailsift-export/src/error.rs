//! Error types for the export library.

use thiserror::Error;

/// Errors that can occur while rendering or persisting an export.
///
/// A user cancelling the save dialog is not an error; see
/// [`crate::ExportOutcome::Cancelled`].
#[derive(Debug, Error)]
pub enum ExportError {
    /// There were no messages to export.
    #[error("no messages to export")]
    NoMessages,

    /// No fields were selected for export.
    #[error("no fields selected for export")]
    NoFields,

    /// The host's save-path negotiation failed, as opposed to cancelled.
    #[error("save dialog failed: {0}")]
    Dialog(String),

    /// Writing the export file failed.
    #[error("failed to write export file: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, ExportError>;

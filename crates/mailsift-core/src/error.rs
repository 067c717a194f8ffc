//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Session operation failed.
    #[error("session error: {0}")]
    Session(#[from] mailsift_session::Error),

    /// Export rendering or persistence failed.
    #[error("export error: {0}")]
    Export(#[from] mailsift_export::ExportError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

//! # mailsift-core
//!
//! Service layer for MailSift.
//!
//! This crate provides:
//! - The in-memory settings store (the "last-used config" a session
//!   reconnects with)
//! - The [`MailService`] facade wiring settings, session manager, and
//!   export pipeline into one explicitly owned instance
//! - An aggregate error type over the session and export crates
//!
//! The calling context (a GUI, a CLI) constructs one `MailService` per
//! account session, hands it a [`mailsift_session::MailTransport`]
//! implementation, and drops it on exit.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod service;
mod settings;

pub use error::{Error, Result};
pub use service::{LastSearch, MailService};
pub use settings::SettingsStore;

pub use mailsift_export::{DownloadSink, ExportFormat, ExportOutcome, SavePrompt};
pub use mailsift_session::{
    ConfigProvider, ConnectionConfig, MailTransport, Message, SearchResult, SessionManager,
    SessionOptions,
};

//! The transport boundary: the external component that speaks the actual
//! mail-retrieval protocol.
//!
//! The session manager never opens sockets itself; it drives an
//! implementation of [`MailTransport`] through four request/response calls
//! and interprets the errors it gets back. Implementations live outside this
//! crate: a real IMAP client, a proxy, or a test double.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConnectionConfig;

/// A single message record as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message subject.
    pub subject: String,
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Message date.
    pub date: DateTime<Utc>,
    /// Preview snippet of the message body.
    pub body_preview: String,
}

/// An ordered page of messages plus pagination metadata.
///
/// The session manager passes this through unmodified; its shape is owned by
/// the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Messages on this page, in server order.
    pub messages: Vec<Message>,
    /// Total number of matches across all pages.
    pub total: u32,
    /// Page number (1-based).
    pub page: u32,
    /// Page size used by the transport.
    pub page_size: u32,
}

impl SearchResult {
    /// A result with every match on one page.
    #[must_use]
    pub fn single_page(messages: Vec<Message>) -> Self {
        let total = u32::try_from(messages.len()).unwrap_or(u32::MAX);
        Self {
            messages,
            total,
            page: 1,
            page_size: total.max(1),
        }
    }
}

/// Errors reported by the transport boundary.
///
/// The variants classify the failure; the session manager only ever inspects
/// the classification (see [`TransportError::is_connection_loss`]) and logs
/// the detail.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying connection was dropped mid-operation.
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// The transport was never connected.
    #[error("not connected to the server")]
    NotConnected,

    /// The server rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The server sent something the transport could not handle.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error during network operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether this error means the session's connection is gone.
    ///
    /// Loss-classified errors make the manager drop to `Disconnected` and
    /// run its bounded reconnect-and-retry cycle; anything else surfaces
    /// without a retry.
    #[must_use]
    pub const fn is_connection_loss(&self) -> bool {
        matches!(self, Self::ConnectionLost(_) | Self::NotConnected)
    }
}

/// Result type for transport calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// The four-operation request/response boundary the session manager drives.
///
/// Every call may suspend for a network round trip and may fail
/// independently. Implementations keep whatever wire-level state they need
/// behind `&self`; the manager serializes calls, so no two operations run
/// concurrently against the same transport.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Establishes the connection described by `config`.
    async fn connect(&self, config: &ConnectionConfig) -> TransportResult<()>;

    /// Runs a keyword search (subject-based matching) and returns a page of
    /// results.
    async fn search(&self, keyword: &str) -> TransportResult<SearchResult>;

    /// Probes the connection for liveness.
    async fn ping(&self) -> TransportResult<()>;

    /// Tears the connection down.
    async fn disconnect(&self) -> TransportResult<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_classification() {
        assert!(TransportError::ConnectionLost("reset by peer".into()).is_connection_loss());
        assert!(TransportError::NotConnected.is_connection_loss());
        assert!(!TransportError::Auth("bad password".into()).is_connection_loss());
        assert!(!TransportError::Protocol("unexpected literal".into()).is_connection_loss());
    }

    #[test]
    fn test_single_page_result() {
        let result = SearchResult::single_page(vec![]);
        assert_eq!(result.total, 0);
        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 1);
    }
}

//! Error types for the session library.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during session operations.
///
/// Transport-level detail is logged, never carried here: callers get a small
/// fixed set of user-presentable messages they can act on.
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration fields are missing; the transport was never
    /// contacted.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(#[from] ConfigError),

    /// The transport rejected the connection attempt.
    #[error("connection failed: {0}")]
    ConnectFailure(String),

    /// A search was attempted with no connection and no usable stored
    /// config.
    #[error("not connected to the mail server")]
    NotConnected,

    /// A search failed after at most one reconnect-and-retry cycle.
    #[error("search failed: {0}")]
    SearchFailure(String),

    /// The transport's disconnect call raised; session state was cleaned up
    /// regardless.
    #[error("disconnect failed: {0}")]
    DisconnectFailure(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

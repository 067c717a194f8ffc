//! Connection configuration and the config-provider capability.

use serde::{Deserialize, Serialize};

/// Default IMAP-over-TLS port.
pub const DEFAULT_PORT: u16 = 993;

/// Parameters for one connection attempt against the mail store.
///
/// A config is immutable per attempt; reconfiguration replaces the whole
/// record. `host`, `username`, and `password` must be non-empty before the
/// config is usable (see [`ConnectionConfig::validate`]).
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server hostname.
    pub host: String,
    /// Server port (default: 993).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
    /// Whether to use a TLS-secured transport (default: true).
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_use_tls() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
            use_tls: true,
        }
    }
}

impl ConnectionConfig {
    /// Creates a configuration with the default port and TLS enabled.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables or disables TLS.
    #[must_use]
    pub const fn use_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Validates the required fields.
    ///
    /// # Errors
    ///
    /// Returns the first missing field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        Ok(())
    }

    /// Returns true if the config has every field required to connect.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

/// Validation error for a connection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Server hostname is empty.
    EmptyHost,
    /// Username is empty.
    EmptyUsername,
    /// Password is empty.
    EmptyPassword,
}

impl ConfigError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyHost => "Server hostname is required",
            Self::EmptyUsername => "Username is required",
            Self::EmptyPassword => "Password is required",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyHost => "host",
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ConfigError {}

/// Capability the session manager queries for a reconnect config.
///
/// The manager is constructed with a provider instead of reaching into a
/// global settings store; implementations hand out the last-used connection
/// record, or `None` when nothing usable is stored.
pub trait ConfigProvider: Send + Sync {
    /// Returns the stored connection config, if one is usable.
    fn connection_config(&self) -> Option<ConnectionConfig>;
}

/// A provider with nothing stored.
///
/// Use this when the caller manages configs itself and implicit reconnects
/// should rely solely on the config from the last successful `connect`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStoredConfig;

impl ConfigProvider for NoStoredConfig {
    fn connection_config(&self) -> Option<ConnectionConfig> {
        None
    }
}

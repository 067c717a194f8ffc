//! In-memory settings store for the connection record.
//!
//! This is the "last-used configuration" the session manager queries when it
//! needs to reconnect. It holds exactly one record, replaced wholesale on
//! reconfiguration; persistence beyond process lifetime is someone else's
//! concern.

use std::sync::RwLock;

use mailsift_session::{ConfigProvider, ConnectionConfig};

/// Holder for the current connection configuration.
#[derive(Debug, Default)]
pub struct SettingsStore {
    config: RwLock<ConnectionConfig>,
}

impl SettingsStore {
    /// Creates an empty store (default port, TLS on, no credentials).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored configuration wholesale.
    pub fn set(&self, config: ConnectionConfig) {
        *self.write_lock() = config;
    }

    /// Returns a copy of the stored configuration.
    #[must_use]
    pub fn current(&self) -> ConnectionConfig {
        self.read_lock().clone()
    }

    /// Resets the store to an empty configuration.
    pub fn clear(&self) {
        *self.write_lock() = ConnectionConfig::default();
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, ConnectionConfig> {
        self.config.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, ConnectionConfig> {
        self.config.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ConfigProvider for SettingsStore {
    /// Yields the stored record only when it is complete enough to connect
    /// with.
    fn connection_config(&self) -> Option<ConnectionConfig> {
        let config = self.read_lock();
        config.is_complete().then(|| config.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_provides_nothing() {
        let store = SettingsStore::new();
        assert!(store.connection_config().is_none());
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let store = SettingsStore::new();
        store.set(ConnectionConfig::new("mail.example.com", "a@example.com", "x").port(143));

        let current = store.current();
        assert_eq!(current.host, "mail.example.com");
        assert_eq!(current.port, 143);

        store.set(ConnectionConfig::new("imap.example.org", "b@example.org", "y"));
        let current = store.current();
        assert_eq!(current.host, "imap.example.org");
        assert_eq!(current.port, 993, "old port does not survive replacement");
    }

    #[test]
    fn test_incomplete_record_is_not_provided() {
        let store = SettingsStore::new();
        store.set(ConnectionConfig::new("mail.example.com", "", ""));
        assert!(store.connection_config().is_none());
    }

    #[test]
    fn test_clear_resets_to_defaults() {
        let store = SettingsStore::new();
        store.set(ConnectionConfig::new("mail.example.com", "a@example.com", "x"));
        store.clear();

        assert!(store.connection_config().is_none());
        assert_eq!(store.current().port, 993);
    }
}

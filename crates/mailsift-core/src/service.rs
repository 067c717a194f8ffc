//! The mail service facade.
//!
//! One explicitly constructed, explicitly owned instance per calling
//! context: it wires the settings store, the session manager, and the export
//! pipeline together, and is torn down by dropping it (or calling
//! [`MailService::disconnect`] first for a clean logout).

use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{debug, info};

use mailsift_export::{
    DownloadSink, ExportFormat, ExportOutcome, SavePrompt, render, save_with_prompt,
};
use mailsift_session::{
    ConnectionConfig, MailTransport, Message, SearchResult, SessionManager, SessionOptions,
};

use crate::error::Result;
use crate::settings::SettingsStore;

/// The most recent successful search, kept for re-export and display.
#[derive(Debug, Clone, Serialize)]
pub struct LastSearch {
    /// Keyword the search ran with.
    pub keyword: String,
    /// The result page the transport returned.
    pub result: SearchResult,
}

/// Facade over the session manager and export pipeline.
///
/// The service owns its [`SettingsStore`] and hands it to the session
/// manager as the config provider, so an implicit reconnect always sees the
/// user's latest settings.
pub struct MailService<T> {
    settings: Arc<SettingsStore>,
    session: SessionManager<T>,
    last_search: RwLock<Option<LastSearch>>,
}

impl<T> MailService<T>
where
    T: MailTransport + 'static,
{
    /// Creates a service with default session options.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, SessionOptions::default())
    }

    /// Creates a service with explicit session options.
    #[must_use]
    pub fn with_options(transport: T, options: SessionOptions) -> Self {
        let settings = Arc::new(SettingsStore::new());
        let session = SessionManager::with_options(
            transport,
            Arc::clone(&settings) as Arc<dyn mailsift_session::ConfigProvider>,
            options,
        );
        Self {
            settings,
            session,
            last_search: RwLock::new(None),
        }
    }

    /// The settings store backing this service.
    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Stores `config` as the current settings and connects with it.
    ///
    /// The settings record survives a failed connect, so a later search can
    /// still reconnect once the server comes back.
    ///
    /// # Errors
    ///
    /// Propagates [`mailsift_session::Error`] from the session manager.
    pub async fn connect(&self, config: ConnectionConfig) -> Result<()> {
        self.settings.set(config.clone());
        self.session.connect(config).await?;
        Ok(())
    }

    /// Runs a keyword search and caches the result page.
    ///
    /// # Errors
    ///
    /// Propagates [`mailsift_session::Error`] from the session manager.
    pub async fn search(&self, keyword: &str) -> Result<SearchResult> {
        let result = self.session.search(keyword).await?;
        debug!(
            keyword,
            matches = result.total,
            page = result.page,
            "search completed"
        );
        *self.lock_last_search() = Some(LastSearch {
            keyword: keyword.to_owned(),
            result: result.clone(),
        });
        Ok(result)
    }

    /// The most recent successful search, if any.
    #[must_use]
    pub fn last_search(&self) -> Option<LastSearch> {
        self.lock_last_search().clone()
    }

    /// Disconnects the session and clears the cached search.
    ///
    /// The cached search is cleared even when the transport's disconnect
    /// raises; the user's settings record is kept.
    ///
    /// # Errors
    ///
    /// Propagates [`mailsift_session::Error`] from the session manager.
    pub async fn disconnect(&self) -> Result<()> {
        let outcome = self.session.disconnect().await;
        self.lock_last_search().take();
        outcome?;
        Ok(())
    }

    /// Probes the session for liveness.
    pub async fn ping(&self) -> bool {
        self.session.ping().await
    }

    /// Returns true if the session is currently connected.
    pub async fn is_connected(&self) -> bool {
        self.session.is_connected().await
    }

    /// Renders `messages` and persists them through a save dialog.
    ///
    /// # Errors
    ///
    /// Propagates [`mailsift_export::ExportError`].
    pub async fn export_with_prompt<P>(
        &self,
        prompt: &P,
        messages: &[Message],
        fields: &[String],
        format: ExportFormat,
    ) -> Result<ExportOutcome>
    where
        P: SavePrompt + ?Sized,
    {
        let bytes = render(messages, fields, format)?;
        info!(
            messages = messages.len(),
            columns = fields.len(),
            ?format,
            "exporting via save dialog"
        );
        let outcome = save_with_prompt(prompt, &bytes, &format.default_file_name()).await?;
        Ok(outcome)
    }

    /// Renders `messages` and persists them through the download sink.
    ///
    /// # Errors
    ///
    /// Propagates [`mailsift_export::ExportError`].
    pub async fn export_download(
        &self,
        sink: &DownloadSink,
        messages: &[Message],
        fields: &[String],
        format: ExportFormat,
    ) -> Result<ExportOutcome> {
        let bytes = render(messages, fields, format)?;
        info!(
            messages = messages.len(),
            columns = fields.len(),
            ?format,
            "exporting via download"
        );
        let outcome = sink.save(&bytes, &format.default_file_name()).await?;
        Ok(outcome)
    }

    fn lock_last_search(&self) -> std::sync::RwLockWriteGuard<'_, Option<LastSearch>> {
        self.last_search
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for MailService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailService").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mailsift_session::{Error as SessionError, TransportError, TransportResult};

    /// Transport double with a canned mailbox; search matches on subject
    /// substrings, case-insensitively.
    struct CannedTransport {
        mailbox: Vec<Message>,
    }

    impl CannedTransport {
        fn new() -> Self {
            let date = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
            Self {
                mailbox: vec![
                    Message {
                        subject: "Invoice 0001".into(),
                        from: "billing@example.com".into(),
                        to: "a@example.com".into(),
                        date,
                        body_preview: "Your invoice is attached".into(),
                    },
                    Message {
                        subject: "Team meeting".into(),
                        from: "manager@example.com".into(),
                        to: "a@example.com".into(),
                        date,
                        body_preview: "Agenda for Monday".into(),
                    },
                ],
            }
        }
    }

    #[async_trait]
    impl MailTransport for CannedTransport {
        async fn connect(&self, _config: &ConnectionConfig) -> TransportResult<()> {
            Ok(())
        }

        async fn search(&self, keyword: &str) -> TransportResult<SearchResult> {
            let needle = keyword.to_lowercase();
            let matches: Vec<Message> = self
                .mailbox
                .iter()
                .filter(|m| m.subject.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            Ok(SearchResult::single_page(matches))
        }

        async fn ping(&self) -> TransportResult<()> {
            Ok(())
        }

        async fn disconnect(&self) -> TransportResult<()> {
            Err(TransportError::ConnectionLost("already gone".into()))
        }
    }

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("mail.example.com", "a@example.com", "x")
    }

    #[tokio::test]
    async fn connect_stores_settings() {
        let service = MailService::new(CannedTransport::new());
        service.connect(config()).await.unwrap();

        assert!(service.is_connected().await);
        assert_eq!(service.settings().current().host, "mail.example.com");
    }

    #[tokio::test]
    async fn search_caches_last_result() {
        let service = MailService::new(CannedTransport::new());
        service.connect(config()).await.unwrap();

        let page = service.search("invoice").await.unwrap();
        assert_eq!(page.messages.len(), 1);

        let last = service.last_search().unwrap();
        assert_eq!(last.keyword, "invoice");
        assert_eq!(last.result.total, 1);
    }

    #[tokio::test]
    async fn search_without_connect_reconnects_through_settings() {
        let service = MailService::new(CannedTransport::new());
        // Configure without connecting, the way a restored UI session would.
        service.settings().set(config());

        let page = service.search("meeting").await.unwrap();
        assert_eq!(page.messages.len(), 1);
        assert!(service.is_connected().await);
    }

    #[tokio::test]
    async fn search_with_empty_settings_fails_not_connected() {
        let service = MailService::new(CannedTransport::new());

        let err = service.search("anything").await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Session(SessionError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn disconnect_clears_cache_but_keeps_settings() {
        let service = MailService::new(CannedTransport::new());
        service.connect(config()).await.unwrap();
        service.search("invoice").await.unwrap();

        // CannedTransport's disconnect always raises; cleanup must happen
        // anyway.
        let err = service.disconnect().await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Session(SessionError::DisconnectFailure(_))
        ));

        assert!(!service.is_connected().await);
        assert!(service.last_search().is_none());
        assert_eq!(service.settings().current().host, "mail.example.com");
    }

    #[tokio::test]
    async fn export_download_writes_the_search_result() {
        let service = MailService::new(CannedTransport::new());
        service.connect(config()).await.unwrap();
        let page = service.search("invoice").await.unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let sink = DownloadSink::with_dir(tmp.path());
        let fields = vec!["subject".to_owned(), "from".to_owned()];

        let outcome = service
            .export_download(&sink, &page.messages, &fields, ExportFormat::Csv)
            .await
            .unwrap();

        let ExportOutcome::Saved(path) = outcome else {
            panic!("expected a saved export");
        };
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("Subject,Sender\r\n"));
        assert!(text.contains("Invoice 0001"));
    }

    #[tokio::test]
    async fn export_with_no_messages_is_rejected() {
        let service = MailService::new(CannedTransport::new());
        let tmp = tempfile::tempdir().unwrap();
        let sink = DownloadSink::with_dir(tmp.path());
        let fields = vec!["subject".to_owned()];

        let err = service
            .export_download(&sink, &[], &fields, ExportFormat::Csv)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Export(mailsift_export::ExportError::NoMessages)
        ));
    }
}

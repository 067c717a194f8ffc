//! Session lifecycle management with heartbeat and bounded reconnection.
//!
//! `SessionManager` owns the logical session with one remote mailbox: it
//! decides when the connection is healthy, reconnects it transparently on
//! failure, and serializes every operation (including heartbeat ticks)
//! through one mutex so state transitions can never race.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mailsift_session::{ConnectionConfig, NoStoredConfig, SessionManager};
//!
//! let manager = SessionManager::new(transport, Arc::new(NoStoredConfig));
//! manager.connect(ConnectionConfig::new("mail.example.com", "a@example.com", "secret")).await?;
//! let page = manager.search("invoice").await?;
//! manager.disconnect().await?;
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::{ConfigProvider, ConnectionConfig};
use crate::transport::{MailTransport, SearchResult, TransportError};
use crate::{Error, Result};

/// Default heartbeat period.
pub const DEFAULT_HEARTBEAT_PERIOD: Duration = Duration::from_secs(30);

/// Normalized message for connect failures with no detail from the
/// transport.
const CONNECT_FAILURE_HINT: &str = "check network or configuration";

/// Normalized message for search failures; callers never see the raw
/// transport error.
const SEARCH_FAILURE_HINT: &str = "check configuration or network";

/// Tuning knobs for a session manager.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Period between liveness probes while connected.
    pub heartbeat_period: Duration,
    /// Reconnect-and-retry cycles allowed per search call.
    pub search_retries: u32,
}

impl SessionOptions {
    /// Creates the default options: 30 s heartbeat, one retry cycle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            heartbeat_period: DEFAULT_HEARTBEAT_PERIOD,
            search_retries: 1,
        }
    }

    /// Sets the heartbeat period.
    #[must_use]
    pub const fn heartbeat_period(mut self, period: Duration) -> Self {
        self.heartbeat_period = period;
        self
    }

    /// Sets the number of reconnect-and-retry cycles per search.
    #[must_use]
    pub const fn search_retries(mut self, retries: u32) -> Self {
        self.search_retries = retries;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Current state of the session. A connect attempt resolves to exactly one
/// of these; there is no externally observable "connecting" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Disconnected,
    Connected,
}

/// Mutable session state. Everything that must transition atomically lives
/// here, behind one mutex.
struct Inner {
    state: SessionState,
    /// Config from the last successful connect; kept across connection loss,
    /// cleared on explicit disconnect.
    config: Option<ConnectionConfig>,
    /// Live heartbeat task. `Some` iff `state` is `Connected`.
    heartbeat: Option<JoinHandle<()>>,
}

impl Inner {
    /// Drops to `Disconnected` after a connection loss. Stored config is
    /// kept so a reconnect can reuse it.
    fn drop_connection(&mut self) {
        self.state = SessionState::Disconnected;
        if let Some(handle) = self.heartbeat.take() {
            handle.abort();
        }
    }
}

/// Manager for the logical session between this process and one remote
/// mailbox.
///
/// Constructed with the transport it drives and a [`ConfigProvider`] it
/// queries when an implicit reconnect needs a config. `Disconnected` is both
/// the initial and a re-enterable state; the manager is reusable
/// indefinitely.
///
/// ```text
/// Disconnected --connect() success--------------------> Connected
/// Connected    --disconnect()-------------------------> Disconnected
/// Connected    --ping() failure-------------------------> Disconnected
/// Disconnected --search(), implicit reconnect success--> Connected
/// ```
pub struct SessionManager<T> {
    transport: Arc<T>,
    provider: Arc<dyn ConfigProvider>,
    options: SessionOptions,
    inner: Arc<Mutex<Inner>>,
}

impl<T> SessionManager<T>
where
    T: MailTransport + 'static,
{
    /// Creates a manager with default options.
    #[must_use]
    pub fn new(transport: T, provider: Arc<dyn ConfigProvider>) -> Self {
        Self::with_options(transport, provider, SessionOptions::default())
    }

    /// Creates a manager with explicit options.
    #[must_use]
    pub fn with_options(
        transport: T,
        provider: Arc<dyn ConfigProvider>,
        options: SessionOptions,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            provider,
            options,
            inner: Arc::new(Mutex::new(Inner {
                state: SessionState::Disconnected,
                config: None,
                heartbeat: None,
            })),
        }
    }

    /// Returns true if the session is currently connected.
    pub async fn is_connected(&self) -> bool {
        self.inner.lock().await.state == SessionState::Connected
    }

    /// Connects using `config` and starts the heartbeat.
    ///
    /// Validation happens before the transport is contacted. A connect while
    /// already connected replaces the stored config and re-arms the single
    /// heartbeat task.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigInvalid`] when a required field is missing (zero
    /// transport calls), [`Error::ConnectFailure`] when the transport
    /// rejects the attempt.
    pub async fn connect(&self, config: ConnectionConfig) -> Result<()> {
        config.validate()?;

        let mut inner = self.inner.lock().await;
        self.establish(&mut inner, config).await.map_err(|e| {
            warn!(error = %e, "transport refused connection");
            connect_failure(&e)
        })?;

        info!("session connected");
        Ok(())
    }

    /// Runs a keyword search against the mailbox.
    ///
    /// When disconnected, one implicit reconnect is attempted first using
    /// the stored config (or the provider's). A search that fails with a
    /// connection-loss-classified error gets at most one reconnect-and-retry
    /// cycle; every failure surfaces as one normalized error.
    ///
    /// # Errors
    ///
    /// [`Error::NotConnected`] when disconnected with no usable config
    /// (zero transport calls), [`Error::SearchFailure`] otherwise.
    pub async fn search(&self, keyword: &str) -> Result<SearchResult> {
        let mut inner = self.inner.lock().await;

        if inner.state != SessionState::Connected {
            let Some(config) = self.reconnect_config(&inner) else {
                return Err(Error::NotConnected);
            };
            debug!(host = %config.host, "implicit reconnect before search");
            if let Err(e) = self.establish(&mut inner, config).await {
                warn!(error = %e, "implicit reconnect failed");
                return Err(Error::SearchFailure(SEARCH_FAILURE_HINT.to_owned()));
            }
        }

        let mut retries_left = self.options.search_retries;
        loop {
            match self.transport.search(keyword).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_connection_loss() && retries_left > 0 => {
                    retries_left -= 1;
                    debug!(error = %e, "search hit a dropped connection, reconnecting");
                    inner.drop_connection();

                    let Some(config) = self.reconnect_config(&inner) else {
                        return Err(Error::SearchFailure(SEARCH_FAILURE_HINT.to_owned()));
                    };
                    if let Err(reconnect) = self.establish(&mut inner, config).await {
                        warn!(error = %reconnect, "reconnect during search failed");
                        return Err(Error::SearchFailure(SEARCH_FAILURE_HINT.to_owned()));
                    }
                }
                Err(e) => {
                    warn!(error = %e, "search failed");
                    if e.is_connection_loss() {
                        inner.drop_connection();
                    }
                    return Err(Error::SearchFailure(SEARCH_FAILURE_HINT.to_owned()));
                }
            }
        }
    }

    /// Disconnects from the mailbox.
    ///
    /// No-op when already disconnected. State cleanup (disconnected state,
    /// cleared config, cancelled heartbeat) happens even when the transport
    /// call raises; the error is surfaced afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::DisconnectFailure`] when the transport's disconnect raised.
    pub async fn disconnect(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionState::Connected {
            return Ok(());
        }

        let outcome = self.transport.disconnect().await;

        inner.drop_connection();
        inner.config = None;

        match outcome {
            Ok(()) => {
                info!("session disconnected");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "transport disconnect raised, state cleaned up anyway");
                Err(Error::DisconnectFailure(e.to_string()))
            }
        }
    }

    /// Probes the connection for liveness.
    ///
    /// Returns false immediately when disconnected, without a transport
    /// call. A failed probe marks the session disconnected. Never returns an
    /// error: this is a health probe, not an operation with failure modes.
    pub async fn ping(&self) -> bool {
        probe(self.transport.as_ref(), &self.inner).await
    }

    /// Resolves a config for reconnection: the one from the last successful
    /// connect, else whatever the provider has stored. Incomplete configs
    /// are not usable.
    fn reconnect_config(&self, inner: &Inner) -> Option<ConnectionConfig> {
        inner
            .config
            .clone()
            .filter(ConnectionConfig::is_complete)
            .or_else(|| {
                self.provider
                    .connection_config()
                    .filter(ConnectionConfig::is_complete)
            })
    }

    /// Connects the transport and, on success, commits the new session
    /// state. On failure the previous state is left untouched.
    async fn establish(
        &self,
        inner: &mut Inner,
        config: ConnectionConfig,
    ) -> std::result::Result<(), TransportError> {
        self.transport.connect(&config).await?;
        inner.config = Some(config);
        inner.state = SessionState::Connected;
        self.arm_heartbeat(inner);
        Ok(())
    }

    /// Starts the heartbeat task, replacing any previous one so at most one
    /// timer is ever alive per manager.
    fn arm_heartbeat(&self, inner: &mut Inner) {
        if let Some(handle) = inner.heartbeat.take() {
            handle.abort();
        }
        inner.heartbeat = Some(tokio::spawn(heartbeat_loop(
            Arc::clone(&self.transport),
            Arc::downgrade(&self.inner),
            self.options.heartbeat_period,
        )));
    }
}

impl<T> std::fmt::Debug for SessionManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("heartbeat_period", &self.options.heartbeat_period)
            .field("search_retries", &self.options.search_retries)
            .finish_non_exhaustive()
    }
}

impl<T> Drop for SessionManager<T> {
    fn drop(&mut self) {
        // The heartbeat task only holds a Weak to the shared state, so it
        // exits on its own once the manager is gone; aborting here makes
        // teardown immediate when no operation is in flight.
        if let Ok(mut inner) = self.inner.try_lock()
            && let Some(handle) = inner.heartbeat.take()
        {
            handle.abort();
        }
    }
}

/// Shared ping logic used by both [`SessionManager::ping`] and the heartbeat
/// task. Returns whether the session is still connected afterwards.
async fn probe<T>(transport: &T, inner: &Mutex<Inner>) -> bool
where
    T: MailTransport + ?Sized,
{
    let mut guard = inner.lock().await;
    if guard.state != SessionState::Connected {
        return false;
    }
    match transport.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "liveness probe failed, dropping session");
            guard.drop_connection();
            false
        }
    }
}

/// Recurring liveness probe. Exits when the manager is dropped or the
/// session is no longer connected; the probe itself already performed the
/// state transition.
async fn heartbeat_loop<T>(transport: Arc<T>, shared: Weak<Mutex<Inner>>, period: Duration)
where
    T: MailTransport + ?Sized,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick completes immediately; the first probe should
    // wait a full period.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(inner) = shared.upgrade() else {
            return;
        };
        if !probe(transport.as_ref(), &inner).await {
            return;
        }
    }
}

/// Builds the normalized connect failure: the transport's message when it
/// has one, else the generic hint.
fn connect_failure(e: &TransportError) -> Error {
    let message = e.to_string();
    if message.is_empty() {
        Error::ConnectFailure(CONNECT_FAILURE_HINT.to_owned())
    } else {
        Error::ConnectFailure(message)
    }
}

//! # mailsift-session
//!
//! Session lifecycle management for a single remote mailbox: connection
//! state, periodic liveness probing, and a bounded reconnect-on-failure
//! policy.
//!
//! The actual mail-retrieval protocol is an external collaborator behind the
//! [`MailTransport`] boundary: four independent request/response calls
//! (connect, search, ping, disconnect). This crate decides *when* to make
//! those calls, never *how* they travel the wire.
//!
//! ## Features
//!
//! - **One canonical state machine**: `Disconnected` ⇄ `Connected`, no
//!   externally observable intermediate states
//! - **Heartbeat**: a single recurring probe task per manager (default
//!   30 s), armed on connect, torn down on disconnect or probe failure
//! - **Implicit reconnect**: a search on a dropped session reconnects once
//!   using the stored config or an injected [`ConfigProvider`]
//! - **Normalized errors**: transport detail is logged, callers get a small
//!   fixed set of user-presentable failures
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use mailsift_session::{ConnectionConfig, NoStoredConfig, SessionManager};
//!
//! let manager = SessionManager::new(transport, Arc::new(NoStoredConfig));
//!
//! let config = ConnectionConfig::new("mail.example.com", "user@example.com", "secret");
//! manager.connect(config).await?;
//!
//! let page = manager.search("invoice").await?;
//! println!("{} of {} messages", page.messages.len(), page.total);
//!
//! manager.disconnect().await?;
//! ```
//!
//! ## State machine
//!
//! ```text
//! Disconnected --connect() success--------------------> Connected
//! Connected    --disconnect()-------------------------> Disconnected
//! Connected    --ping() failure-------------------------> Disconnected
//! Disconnected --search(), implicit reconnect success--> Connected
//! ```
//!
//! `Disconnected` is both the initial and a re-enterable state; there is no
//! terminal state and a manager is reusable indefinitely.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod manager;
pub mod transport;

pub use config::{ConfigError, ConfigProvider, ConnectionConfig, DEFAULT_PORT, NoStoredConfig};
pub use error::{Error, Result};
pub use manager::{DEFAULT_HEARTBEAT_PERIOD, SessionManager, SessionOptions};
pub use transport::{MailTransport, Message, SearchResult, TransportError, TransportResult};

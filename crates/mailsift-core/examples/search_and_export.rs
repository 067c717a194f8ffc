#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::uninlined_format_args,
    missing_docs
)]
//! Example: search a demo mailbox and export the matches.
//!
//! Runs the full flow (configure, connect, search, export, disconnect)
//! against an in-memory transport with canned messages, so it works without
//! a mail server. Swap `DemoTransport` for a real `MailTransport`
//! implementation to drive an actual mailbox.
//!
//! ## Running
//!
//! ```bash
//! cargo run --package mailsift-core --example search_and_export
//! cargo run --package mailsift-core --example search_and_export -- notice
//! RUST_LOG=mailsift_session=debug cargo run --package mailsift-core --example search_and_export
//! ```

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailsift_core::{
    ConnectionConfig, DownloadSink, ExportFormat, ExportOutcome, MailService, MailTransport,
    Message, SearchResult,
};
use mailsift_session::TransportResult;

/// In-memory transport with a canned mailbox. Search matches subject
/// substrings, case-insensitively, the way the real transport matches on the
/// Subject header.
struct DemoTransport {
    mailbox: Vec<Message>,
}

impl DemoTransport {
    fn new() -> Self {
        let mailbox = [
            ("Test message 1", "sender1@example.com", 1),
            ("Test message 2", "sender2@example.com", 2),
            ("Important notice", "admin@example.com", 3),
            ("Meeting schedule", "manager@example.com", 4),
            ("Project status", "developer@example.com", 5),
        ]
        .into_iter()
        .map(|(subject, from, day)| Message {
            subject: subject.to_owned(),
            from: from.to_owned(),
            to: "recipient@example.com".to_owned(),
            date: Utc.with_ymd_and_hms(2024, 1, day, 9 + day, 0, 0).unwrap(),
            body_preview: format!("Preview of {}", subject.to_lowercase()),
        })
        .collect();

        Self { mailbox }
    }
}

#[async_trait]
impl MailTransport for DemoTransport {
    async fn connect(&self, config: &ConnectionConfig) -> TransportResult<()> {
        println!("demo transport connected to {}:{}", config.host, config.port);
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
        println!("demo transport disconnected");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsift_core=debug,mailsift_session=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let keyword = std::env::args().nth(1).unwrap_or_else(|| "test".to_owned());

    let service = MailService::new(DemoTransport::new());
    service
        .connect(ConnectionConfig::new(
            "mail.example.com",
            "recipient@example.com",
            "demo-password",
        ))
        .await?;

    let page = service.search(&keyword).await?;
    println!(
        "search for {:?} matched {} of 5 messages:",
        keyword, page.total
    );
    println!("{}", serde_json::to_string_pretty(&page.messages)?);

    if page.messages.is_empty() {
        println!("nothing to export");
    } else {
        let sink = DownloadSink::with_dir(std::env::temp_dir());
        let fields = vec![
            "subject".to_owned(),
            "from".to_owned(),
            "to".to_owned(),
            "date".to_owned(),
        ];
        match service
            .export_download(&sink, &page.messages, &fields, ExportFormat::Csv)
            .await?
        {
            ExportOutcome::Saved(path) => println!("exported to {}", path.display()),
            ExportOutcome::Cancelled => println!("export cancelled"),
        }
    }

    service.disconnect().await?;
    Ok(())
}

//! Mailway - a transactional email dispatch engine
//!
//! Mailway is built on Tokio and lettre. Callers submit a logical email
//! (recipient, template, data bag, optional priority and schedule); the
//! engine queues it, renders it from a named template, delivers it over an
//! outbound SMTP transport, and exposes per-job delivery status and
//! aggregate statistics. State is held in memory for the lifetime of the
//! process.
//!
//! # Features
//!
//! - **Bounded queue**: submissions fail fast when the queue is full
//!   instead of blocking the caller
//! - **Worker pool**: a fixed number of concurrent workers drain the queue
//! - **Retries**: failed deliveries are retried up to three times with an
//!   increasing delay
//! - **Scheduling**: a request can carry a future send time
//! - **Status and stats**: per-job lifecycle tracking and running counters
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mailway::{Dispatcher, DispatchConfig, EmailRequest, SmtpTransport, TemplateId};
//!
//! #[tokio::main]
//! async fn main() -> mailway::Result<()> {
//!     // Initialize logging
//!     mailway::init_tracing();
//!
//!     let transport = Arc::new(SmtpTransport::from_env()?);
//!     let dispatcher = Dispatcher::new(DispatchConfig::from_env(), transport)?;
//!
//!     let request = EmailRequest::new("user@example.com", TemplateId::UserWelcome)
//!         .data("name", "Ada")
//!         .data("activation_link", "https://example.com/activate/abc");
//!
//!     let response = dispatcher.submit(request).await?;
//!     println!("queued as {}", response.id);
//!
//!     Ok(())
//! }
//! ```

mod config;
pub mod dispatch;
mod error;
pub mod queue;
pub mod stats;
pub mod status;
pub mod template;
pub mod transport;
mod types;
pub mod utils;

// Re-exports for public API
pub use config::{Config, DispatchConfig, SmtpConfig};
pub use dispatch::{Dispatcher, Worker, WorkerPool};
pub use error::{MailwayError, Result};
pub use queue::{Job, JobQueue};
pub use stats::{Stats, StatsRecorder};
pub use status::StatusStore;
pub use template::{RenderedContent, TemplateEngine};
pub use transport::{ConsoleTransport, OutboundEmail, SmtpTransport, Transport};
pub use types::{
    BulkEmailRequest, DeliveryState, EmailRequest, EmailResponse, EmailStatus, Priority,
    TemplateCatalog, TemplateId,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, before constructing the
/// [`Dispatcher`].
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "mailway=debug")
/// - `MAILWAY_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("MAILWAY_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

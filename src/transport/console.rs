//! Console transport for development
//!
//! Prints messages to stdout instead of delivering them, useful for local
//! development. Body content is redacted by default since stdout is often
//! captured by logging systems.

use async_trait::async_trait;

use crate::error::Result;
use crate::transport::{OutboundEmail, Transport};

/// A transport that prints messages to stdout instead of sending them
///
/// # Example
///
/// ```rust,ignore
/// use mailway::transport::{ConsoleTransport, OutboundEmail, Transport};
///
/// let transport = ConsoleTransport::new();
///
/// let email = OutboundEmail::new("to@example.com", "Test")
///     .text("Hello!");
///
/// transport.deliver(&email).await?; // Prints to stdout
/// ```
#[derive(Debug, Clone)]
pub struct ConsoleTransport {
    /// Optional prefix for log output
    prefix: String,
    /// Whether to show full body content (default: false)
    show_full_content: bool,
}

impl ConsoleTransport {
    /// Create a new console transport
    ///
    /// Body content is redacted by default; use `with_full_output(true)`
    /// to see full content during development.
    pub fn new() -> Self {
        Self {
            prefix: "[EMAIL]".to_string(),
            show_full_content: false,
        }
    }

    /// Create a console transport with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            show_full_content: false,
        }
    }

    /// Enable or disable full body output
    pub fn with_full_output(mut self, enabled: bool) -> Self {
        if enabled {
            tracing::warn!(
                "ConsoleTransport: full output enabled - email content will be visible in logs"
            );
        }
        self.show_full_content = enabled;
        self
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn deliver(&self, email: &OutboundEmail) -> Result<()> {
        println!("{} ════════════════════════════════════════", self.prefix);
        println!("{} To:       {}", self.prefix, email.to);
        println!("{} Subject:  {}", self.prefix, email.subject);
        println!("{} Priority: {}", self.prefix, email.priority);
        println!("{} ────────────────────────────────────────", self.prefix);

        if self.show_full_content {
            println!("{} [TEXT]", self.prefix);
            for line in email.text.lines() {
                println!("{} {}", self.prefix, line);
            }
            println!("{} [HTML]", self.prefix);
            for line in email.html.lines() {
                println!("{} {}", self.prefix, line);
            }
        } else {
            println!("{} [TEXT] {} bytes [REDACTED]", self.prefix, email.text.len());
            println!("{} [HTML] {} bytes [REDACTED]", self.prefix, email.html.len());
        }

        println!("{} ════════════════════════════════════════", self.prefix);

        Ok(())
    }

    fn is_healthy(&self) -> bool {
        true // Console is always available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_transport_delivers_without_error() {
        let transport = ConsoleTransport::new();
        let email = OutboundEmail::new("to@test.com", "Test Subject")
            .text("Test body")
            .html("<p>Test body</p>");

        let result = transport.deliver(&email).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_console_transport_is_healthy() {
        let transport = ConsoleTransport::new();
        assert!(transport.is_healthy());
    }

    #[test]
    fn test_console_transport_with_prefix() {
        let transport = ConsoleTransport::with_prefix("[CUSTOM]");
        assert!(transport.is_healthy());
    }
}

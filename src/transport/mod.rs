//! Outbound mail transports
//!
//! The [`Transport`] trait abstracts the delivery mechanism so the worker
//! pool can run against a real SMTP relay, a console printer for development,
//! or a stub in tests.

mod console;
mod smtp;

pub use console::ConsoleTransport;
pub use smtp::SmtpTransport;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Priority;

/// A fully rendered message, ready for delivery to a single recipient
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    /// Plain text body
    pub text: String,
    /// HTML alternative body
    pub html: String,
    pub priority: Priority,
}

impl OutboundEmail {
    /// Create a new message with the required fields
    pub fn new(to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: String::new(),
            html: String::new(),
            priority: Priority::default(),
        }
    }

    /// Set the plain text body
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text = body.into();
        self
    }

    /// Set the HTML body
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html = body.into();
        self
    }

    /// Set the delivery priority
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Transport trait for delivering rendered messages
///
/// # Example
///
/// ```rust,ignore
/// use mailway::transport::{OutboundEmail, Transport};
/// use async_trait::async_trait;
///
/// struct MyTransport;
///
/// #[async_trait]
/// impl Transport for MyTransport {
///     async fn deliver(&self, email: &OutboundEmail) -> mailway::Result<()> {
///         // Hand off to your preferred delivery service
///         Ok(())
///     }
///
///     fn is_healthy(&self) -> bool {
///         true
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one message
    ///
    /// Returns an error if delivery failed; the error text becomes the
    /// job's failure reason.
    async fn deliver(&self, email: &OutboundEmail) -> Result<()>;

    /// Check if the transport backend is healthy/connected
    fn is_healthy(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_email_builder() {
        let email = OutboundEmail::new("to@test.com", "Test Subject")
            .text("Plain text body")
            .html("<p>HTML body</p>")
            .priority(Priority::High);

        assert_eq!(email.to, "to@test.com");
        assert_eq!(email.subject, "Test Subject");
        assert_eq!(email.text, "Plain text body");
        assert_eq!(email.html, "<p>HTML body</p>");
        assert_eq!(email.priority, Priority::High);
    }

    #[test]
    fn test_outbound_email_defaults_to_normal_priority() {
        let email = OutboundEmail::new("to@test.com", "Test");
        assert_eq!(email.priority, Priority::Normal);
    }
}

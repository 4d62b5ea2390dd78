//! SMTP transport using lettre
//!
//! Delivers rendered messages over network mail submission with a fixed
//! dial/send timeout.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{
        header::{ContentType, Header, HeaderName, HeaderValue},
        Mailbox, MultiPart, SinglePart,
    },
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;
use crate::error::{MailwayError, Result};
use crate::transport::{OutboundEmail, Transport};

/// `X-Priority` header carrying the urgency hint for mail clients
#[derive(Debug, Clone, PartialEq)]
struct XPriority(String);

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(s: &str) -> std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// SMTP transport over lettre's async client
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    host: String,
    port: u16,
}

impl SmtpTransport {
    /// Create a new SMTP transport with the given configuration
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let sender: Mailbox = config
            .sender
            .parse()
            .map_err(|e| MailwayError::internal(format!("Invalid sender address: {}", e)))?;

        let mut builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        }
        .map_err(|e| MailwayError::transport(format!("Failed to create SMTP transport: {}", e)))?;

        builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            let credentials = Credentials::new(username.clone(), password.clone());
            builder = builder.credentials(credentials);
        }

        Ok(Self {
            transport: builder.build(),
            sender,
            host: config.host.clone(),
            port: config.port,
        })
    }

    /// Create a new SMTP transport from environment variables
    pub fn from_env() -> Result<Self> {
        let config = SmtpConfig::from_env()?;
        Self::new(&config)
    }

    fn build_message(&self, email: &OutboundEmail) -> Result<Message> {
        let to: Mailbox = email.to.parse().map_err(|e| {
            MailwayError::invalid_address(format!("Invalid recipient '{}': {}", email.to, e))
        })?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(XPriority(email.priority.x_priority().to_string()))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html.clone()),
                    ),
            )
            .map_err(|e| MailwayError::transport(format!("Failed to build message: {}", e)))?;

        Ok(message)
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn deliver(&self, email: &OutboundEmail) -> Result<()> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailwayError::transport(format!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn is_healthy(&self) -> bool {
        // Connection state is not cached; delivery reports its own failures
        true
    }
}

// Implement Debug manually since AsyncSmtpTransport doesn't impl Debug
impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;

    fn transport() -> SmtpTransport {
        let config = SmtpConfig::new("smtp.test.com", "noreply@test.com");
        SmtpTransport::new(&config).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_sender() {
        let config = SmtpConfig::new("smtp.test.com", "not an address");
        let result = SmtpTransport::new(&config);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_build_message_rejects_invalid_recipient() {
        let email = OutboundEmail::new("not-an-email", "Test").text("body").html("<p>body</p>");
        let err = transport().build_message(&email).unwrap_err();
        assert!(matches!(err, MailwayError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn test_build_message_sets_priority_header() {
        let email = OutboundEmail::new("to@test.com", "Test")
            .text("body")
            .html("<p>body</p>")
            .priority(Priority::High);

        let message = transport().build_message(&email).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("X-Priority: 1"));
        assert!(formatted.contains("Subject: Test"));
    }

    #[tokio::test]
    async fn test_build_message_is_multipart_alternative() {
        let email = OutboundEmail::new("to@test.com", "Test")
            .text("plain body")
            .html("<p>html body</p>");

        let message = transport().build_message(&email).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("plain body"));
        assert!(formatted.contains("html body"));
    }
}

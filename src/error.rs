/// The main error type for the mailway engine
#[derive(Debug, thiserror::Error)]
pub enum MailwayError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Queue full: {0}")]
    QueueFull(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl MailwayError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn queue_full(msg: impl Into<String>) -> Self {
        Self::QueueFull(msg.into())
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is surfaced to the submitter synchronously.
    ///
    /// Render and transport failures are absorbed by the workers into status
    /// records; only capacity and lookup errors cross the facade boundary.
    pub fn is_synchronous(&self) -> bool {
        matches!(
            self,
            Self::QueueFull(_) | Self::NotFound(_) | Self::InvalidAddress(_)
        )
    }
}

/// Result type alias for mailway operations
pub type Result<T> = std::result::Result<T, MailwayError>;

// Common error type conversions

impl From<handlebars::RenderError> for MailwayError {
    fn from(err: handlebars::RenderError) -> Self {
        MailwayError::Template(format!("Failed to render template: {}", err))
    }
}

impl From<handlebars::TemplateError> for MailwayError {
    fn from(err: handlebars::TemplateError) -> Self {
        MailwayError::Template(format!("Failed to register template: {}", err))
    }
}

impl From<lettre::address::AddressError> for MailwayError {
    fn from(err: lettre::address::AddressError) -> Self {
        MailwayError::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for MailwayError {
    fn from(err: lettre::error::Error) -> Self {
        MailwayError::Transport(format!("Failed to build message: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for MailwayError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailwayError::Transport(format!("Failed to send email: {}", err))
    }
}

impl From<serde_json::Error> for MailwayError {
    fn from(err: serde_json::Error) -> Self {
        MailwayError::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = MailwayError::not_found("email not found");
        assert!(matches!(err, MailwayError::NotFound(_)));
        assert_eq!(err.to_string(), "Not found: email not found");
        assert!(err.is_synchronous());
    }

    #[test]
    fn test_queue_full_error() {
        let err = MailwayError::queue_full("email queue is full");
        assert!(matches!(err, MailwayError::QueueFull(_)));
        assert_eq!(err.to_string(), "Queue full: email queue is full");
        assert!(err.is_synchronous());
    }

    #[test]
    fn test_invalid_address_error() {
        let err = MailwayError::invalid_address("missing @");
        assert!(matches!(err, MailwayError::InvalidAddress(_)));
        assert_eq!(err.to_string(), "Invalid address: missing @");
    }

    #[test]
    fn test_template_error() {
        let err = MailwayError::template("unknown template");
        assert!(matches!(err, MailwayError::Template(_)));
        assert_eq!(err.to_string(), "Template error: unknown template");
        assert!(!err.is_synchronous());
    }

    #[test]
    fn test_transport_error() {
        let err = MailwayError::transport("connection refused");
        assert!(matches!(err, MailwayError::Transport(_)));
        assert_eq!(err.to_string(), "Transport error: connection refused");
        assert!(!err.is_synchronous());
    }

    #[test]
    fn test_internal_error() {
        let err = MailwayError::internal("something went wrong");
        assert!(matches!(err, MailwayError::Internal(_)));
        assert_eq!(err.to_string(), "Internal error: something went wrong");
    }

    #[test]
    fn test_anyhow_error() {
        let anyhow_err = anyhow::anyhow!("something unexpected");
        let err: MailwayError = anyhow_err.into();
        assert!(matches!(err, MailwayError::Anyhow(_)));
        assert_eq!(err.to_string(), "something unexpected");
    }

    #[test]
    fn test_address_error_conversion() {
        let parse_err = "not-an-email".parse::<lettre::Address>().unwrap_err();
        let err: MailwayError = parse_err.into();
        assert!(matches!(err, MailwayError::InvalidAddress(_)));
    }
}

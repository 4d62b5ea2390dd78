//! Core request, response and status types for the dispatch engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transport-level urgency hint for an outbound message
///
/// Priority only maps to an `X-Priority` header on the delivered message;
/// it does not affect queue position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Normal, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }

    /// `X-Priority` header value: 1 is most urgent, 5 least
    pub fn x_priority(&self) -> &'static str {
        match self {
            Priority::High => "1",
            Priority::Normal => "3",
            Priority::Low => "5",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of supported email templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    UserWelcome,
    PasswordReset,
    EmailVerification,
    Notification,
    Invoice,
    BookingConfirmation,
}

impl TemplateId {
    pub const ALL: [TemplateId; 6] = [
        TemplateId::UserWelcome,
        TemplateId::PasswordReset,
        TemplateId::EmailVerification,
        TemplateId::Notification,
        TemplateId::Invoice,
        TemplateId::BookingConfirmation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::UserWelcome => "user_welcome",
            TemplateId::PasswordReset => "password_reset",
            TemplateId::EmailVerification => "email_verification",
            TemplateId::Notification => "notification",
            TemplateId::Invoice => "invoice",
            TemplateId::BookingConfirmation => "booking_confirmation",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TemplateId::UserWelcome => "User welcome email with activation link",
            TemplateId::PasswordReset => "Password reset email with reset token",
            TemplateId::EmailVerification => "Email verification for account activation",
            TemplateId::Notification => "General notification email",
            TemplateId::Invoice => "Invoice and billing email",
            TemplateId::BookingConfirmation => "Booking confirmation email",
        }
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical email submission
///
/// Requests arrive pre-validated from the caller (non-empty recipient,
/// known template) and are immutable once submitted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailRequest {
    pub to: String,
    pub template: TemplateId,
    /// Literal subject override; when set, the template's subject is skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Key-value bag substituted into the template
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub priority: Priority,
    /// Future send time; the job is held off the queue until it elapses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl EmailRequest {
    /// Create a new request with the required fields
    pub fn new(to: impl Into<String>, template: TemplateId) -> Self {
        Self {
            to: to.into(),
            template,
            subject: None,
            data: Map::new(),
            priority: Priority::default(),
            scheduled_at: None,
        }
    }

    /// Set a literal subject, overriding the template's subject block
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add a template data entry
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set the delivery priority
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Defer delivery until the given time
    pub fn scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(at);
        self
    }
}

/// A bulk submission: the same template and data for many recipients
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BulkEmailRequest {
    pub recipients: Vec<String>,
    pub template: TemplateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Acknowledgment returned from a submission
///
/// `status` is always "queued" and `sent_at` is the submission timestamp;
/// eventual delivery outcome is reported through status queries instead.
#[derive(Debug, Clone, Serialize)]
pub struct EmailResponse {
    pub id: String,
    pub status: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub recipient: String,
}

/// Delivery lifecycle state of a job
///
/// `Sent` and `Failed` are terminal; `Retrying` precedes another
/// `Queued` -> `Sent`/`Failed` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    Pending,
    Queued,
    Sent,
    Retrying,
    Failed,
}

impl DeliveryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryState::Pending => "pending",
            DeliveryState::Queued => "queued",
            DeliveryState::Sent => "sent",
            DeliveryState::Retrying => "retrying",
            DeliveryState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryState::Sent | DeliveryState::Failed)
    }
}

impl std::fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracked delivery status of a single job
///
/// One record per job, created at submission and kept for process lifetime.
/// Queries return clones, so callers never observe a record mid-mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailStatus {
    pub id: String,
    pub status: DeliveryState,
    pub recipient: String,
    pub template: TemplateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Static template metadata: names, descriptions and supported priorities
#[derive(Debug, Clone, Serialize)]
pub struct TemplateCatalog {
    pub templates: BTreeMap<&'static str, &'static str>,
    pub priorities: Vec<&'static str>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self {
            templates: TemplateId::ALL
                .iter()
                .map(|t| (t.as_str(), t.description()))
                .collect(),
            priorities: Priority::ALL.iter().map(|p| p.as_str()).collect(),
        }
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

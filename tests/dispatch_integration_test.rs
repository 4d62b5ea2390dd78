//! Integration tests for the dispatch engine public API
//!
//! These tests drive the full submit -> queue -> render -> transport ->
//! status path through the crate's public surface, with transports stubbed
//! at the trait seam.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mailway::{
    BulkEmailRequest, ConsoleTransport, DeliveryState, DispatchConfig, Dispatcher, EmailRequest,
    EmailStatus, MailwayError, OutboundEmail, Priority, TemplateEngine, TemplateId, Transport,
};
use tokio::time::{sleep, Duration};

/// Delivers everything and remembers what went out
#[derive(Default)]
struct CapturingTransport {
    deliveries: Mutex<Vec<OutboundEmail>>,
}

#[async_trait]
impl Transport for CapturingTransport {
    async fn deliver(&self, email: &OutboundEmail) -> mailway::Result<()> {
        self.deliveries.lock().unwrap().push(email.clone());
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

/// Rejects everything with a fixed reason
#[derive(Default)]
struct RefusingTransport {
    attempts: AtomicU32,
}

#[async_trait]
impl Transport for RefusingTransport {
    async fn deliver(&self, _email: &OutboundEmail) -> mailway::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(MailwayError::transport("550 mailbox unavailable"))
    }

    fn is_healthy(&self) -> bool {
        false
    }
}

async fn wait_for_terminal(dispatcher: &Dispatcher, id: &str) -> EmailStatus {
    for _ in 0..400 {
        let status = dispatcher.status(id).await.unwrap();
        if status.status.is_terminal() {
            return status;
        }
        sleep(Duration::from_millis(25)).await;
    }
    panic!("job {} never reached a terminal state", id);
}

#[tokio::test]
async fn test_lifecycle_through_public_api() {
    let transport = Arc::new(CapturingTransport::default());
    let dispatcher = Dispatcher::new(
        DispatchConfig::default().workers(2).queue_capacity(32),
        transport.clone(),
    )
    .unwrap();

    let request = EmailRequest::new("ada@example.com", TemplateId::BookingConfirmation)
        .data("name", "Ada")
        .data("booking_reference", "BK-1042")
        .priority(Priority::High);

    let response = dispatcher.submit(request).await.unwrap();
    assert_eq!(response.status, "queued");

    let status = wait_for_terminal(&dispatcher, &response.id).await;
    assert_eq!(status.status, DeliveryState::Sent);
    assert_eq!(status.template, TemplateId::BookingConfirmation);

    let deliveries = transport.deliveries.lock().unwrap().clone();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].to, "ada@example.com");
    assert!(deliveries[0].text.contains("BK-1042"));
    assert_eq!(deliveries[0].priority, Priority::High);

    let stats = dispatcher.stats().await;
    assert_eq!(stats.total_sent, 1);
    assert_eq!(stats.total_failed, 0);
}

#[tokio::test]
async fn test_refused_delivery_ends_failed_with_reason() {
    let transport = Arc::new(RefusingTransport::default());
    let dispatcher = Dispatcher::new(
        DispatchConfig::default()
            .workers(1)
            .queue_capacity(8)
            .retry_delay_seconds(0),
        transport.clone(),
    )
    .unwrap();

    let request = EmailRequest::new("gone@example.com", TemplateId::Notification)
        .data("message", "you have mail");

    let response = dispatcher.submit(request).await.unwrap();
    let status = wait_for_terminal(&dispatcher, &response.id).await;

    assert_eq!(status.status, DeliveryState::Failed);
    assert!(status
        .fail_reason
        .as_deref()
        .unwrap()
        .contains("550 mailbox unavailable"));
    assert!(status.sent_at.is_none());

    // One initial attempt plus the default three retries
    assert_eq!(transport.attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_bulk_collects_only_successes() {
    let transport = Arc::new(CapturingTransport::default());
    let dispatcher = Dispatcher::new(
        DispatchConfig::default().workers(2).queue_capacity(32),
        transport.clone(),
    )
    .unwrap();

    let request = BulkEmailRequest {
        recipients: vec![
            "one@example.com".to_string(),
            "broken address".to_string(),
            "two@example.com".to_string(),
        ],
        template: TemplateId::Notification,
        subject: Some("Service notice".to_string()),
        data: serde_json::Map::new(),
    };

    let responses = dispatcher.submit_bulk(request).await;
    assert_eq!(responses.len(), 2);

    for response in &responses {
        let status = wait_for_terminal(&dispatcher, &response.id).await;
        assert_eq!(status.status, DeliveryState::Sent);
    }

    let deliveries = transport.deliveries.lock().unwrap().clone();
    assert_eq!(deliveries.len(), 2);
    for delivery in &deliveries {
        assert_eq!(delivery.subject, "Service notice");
    }
}

#[tokio::test]
async fn test_console_transport_end_to_end() {
    let transport = Arc::new(ConsoleTransport::with_prefix("[TEST]"));
    let dispatcher = Dispatcher::new(
        DispatchConfig::default().workers(1).queue_capacity(8),
        transport,
    )
    .unwrap();

    let request = EmailRequest::new("dev@example.com", TemplateId::UserWelcome).data("name", "Dev");
    let response = dispatcher.submit(request).await.unwrap();

    let status = wait_for_terminal(&dispatcher, &response.id).await;
    assert_eq!(status.status, DeliveryState::Sent);
}

#[test]
fn test_template_engine_is_usable_standalone() {
    let engine = TemplateEngine::new().unwrap();
    let mut data = serde_json::Map::new();
    data.insert("name".to_string(), serde_json::json!("Ada"));
    data.insert("amount".to_string(), serde_json::json!("99.00"));

    let content = engine.render(TemplateId::Invoice, None, &data).unwrap();
    assert!(content.text.contains("99.00"));
    assert!(content.html.contains("99.00"));
}

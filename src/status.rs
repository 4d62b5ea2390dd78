//! Per-job delivery status tracking
//!
//! A shared map from job id to its current [`EmailStatus`], written by
//! workers and read by status queries. Writers take the exclusive lock,
//! queries take the shared lock and return a clone. Records are never
//! evicted; they accumulate for the lifetime of the process.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{MailwayError, Result};
use crate::types::{DeliveryState, EmailStatus, TemplateId};

#[derive(Clone, Default)]
pub struct StatusStore {
    records: Arc<RwLock<HashMap<String, EmailStatus>>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the initial `pending` record for a freshly assigned job id
    ///
    /// Must happen before the job becomes visible to any worker.
    pub async fn create(&self, id: &str, recipient: &str, template: TemplateId) {
        let status = EmailStatus {
            id: id.to_string(),
            status: DeliveryState::Pending,
            recipient: recipient.to_string(),
            template,
            sent_at: None,
            fail_reason: None,
            created_at: Utc::now(),
        };

        self.records.write().await.insert(id.to_string(), status);
    }

    /// The job has been placed on the queue (first enqueue or re-enqueue)
    ///
    /// Only valid from `pending` or `retrying`; a worker may already have
    /// driven the job to a later state, which must not be rolled back.
    pub async fn mark_queued(&self, id: &str) {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(id) {
            if matches!(record.status, DeliveryState::Pending | DeliveryState::Retrying) {
                record.status = DeliveryState::Queued;
            }
        }
    }

    /// Terminal success: stamp the delivery time
    pub async fn mark_sent(&self, id: &str) {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(id) {
            record.status = DeliveryState::Sent;
            record.sent_at = Some(Utc::now());
        }
    }

    /// Failed attempt with retries remaining
    pub async fn mark_retrying(&self, id: &str, reason: String) {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(id) {
            record.status = DeliveryState::Retrying;
            record.fail_reason = Some(reason);
        }
    }

    /// Terminal failure: retries exhausted (or none allowed)
    pub async fn mark_failed(&self, id: &str, reason: String) {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(id) {
            record.status = DeliveryState::Failed;
            record.fail_reason = Some(reason);
        }
    }

    /// Snapshot of a job's current status
    pub async fn get(&self, id: &str) -> Result<EmailStatus> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| MailwayError::not_found("email not found"))
    }
}

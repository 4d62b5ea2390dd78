//! Dispatch facade and worker pool
//!
//! [`Dispatcher`] is the public entry point of the engine: it assigns job
//! ids, records initial status, and feeds the bounded queue that the worker
//! pool drains. Render and delivery outcomes are reported back through the
//! status store and the statistics counters, never to the submitter.

mod worker;


pub use worker::{Worker, WorkerPool};

use std::sync::Arc;

use chrono::Utc;
use lettre::message::Mailbox;
use tokio::time::sleep;
use uuid::Uuid;

use crate::config::DispatchConfig;
use crate::error::Result;
use crate::queue::{Job, JobQueue};
use crate::stats::{Stats, StatsRecorder};
use crate::status::StatusStore;
use crate::template::TemplateEngine;
use crate::transport::Transport;
use crate::types::{
    BulkEmailRequest, EmailRequest, EmailResponse, EmailStatus, Priority, TemplateCatalog,
};

/// The email dispatch engine
///
/// Owns the job queue, status store, statistics and worker pool. Construct
/// one per process and hand it to the outer layer; state is process-lifetime
/// only and lost on exit.
pub struct Dispatcher {
    queue: JobQueue,
    store: StatusStore,
    stats: StatsRecorder,
    pool: WorkerPool,
}

impl Dispatcher {
    /// Create a dispatcher and start its worker pool
    pub fn new(config: DispatchConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let engine = Arc::new(TemplateEngine::new()?);
        let queue = JobQueue::new(config.queue_capacity);
        let store = StatusStore::new();
        let stats = StatsRecorder::new(config.workers);

        let pool = WorkerPool::new(
            queue.clone(),
            store.clone(),
            stats.clone(),
            engine,
            transport,
            &config,
        );

        Ok(Self {
            queue,
            store,
            stats,
            pool,
        })
    }

    /// Submit a single email for delivery
    ///
    /// Assigns a fresh job id, records a `pending` status, and places the job
    /// on the queue. A request with a future `scheduled_at` is held by a
    /// one-shot timer task and enqueued when the send time elapses; the call
    /// itself returns immediately either way. A full queue fails the
    /// submission synchronously instead of blocking the caller.
    pub async fn submit(&self, request: EmailRequest) -> Result<EmailResponse> {
        let id = Uuid::new_v4().to_string();
        let recipient = request.to.clone();
        let scheduled_at = request.scheduled_at;

        // The status record must exist before any worker can see the job.
        self.store.create(&id, &recipient, request.template).await;
        self.stats.record_submitted().await;

        let job = Job::new(id.clone(), request);

        match scheduled_at {
            Some(at) if at > Utc::now() => {
                let queue = self.queue.clone();
                let store = self.store.clone();
                tracing::debug!(job_id = %id, send_at = %at, "Email deferred");
                tokio::spawn(async move {
                    let wait = (at - Utc::now()).to_std().unwrap_or_default();
                    sleep(wait).await;
                    // Mark before pushing so a worker's later transition wins.
                    store.mark_queued(&job.id).await;
                    queue.push_waiting(job).await;
                });
            }
            _ => {
                self.queue.try_push(job).await?;
                self.store.mark_queued(&id).await;
            }
        }

        Ok(EmailResponse {
            id,
            status: "queued".to_string(),
            message: "Email queued for sending".to_string(),
            sent_at: Utc::now(),
            recipient,
        })
    }

    /// Submit the same template to many recipients
    ///
    /// One job per recipient, all at normal priority. A recipient whose
    /// address does not parse, or whose submission is rejected (queue full),
    /// is logged and skipped; the remaining recipients still go through.
    pub async fn submit_bulk(&self, request: BulkEmailRequest) -> Vec<EmailResponse> {
        let mut responses = Vec::with_capacity(request.recipients.len());

        for recipient in &request.recipients {
            if recipient.parse::<Mailbox>().is_err() {
                tracing::warn!(recipient = %recipient, "Skipping invalid bulk recipient");
                continue;
            }

            let email = EmailRequest {
                to: recipient.clone(),
                template: request.template,
                subject: request.subject.clone(),
                data: request.data.clone(),
                priority: Priority::Normal,
                scheduled_at: None,
            };

            match self.submit(email).await {
                Ok(response) => responses.push(response),
                Err(e) => {
                    tracing::warn!(recipient = %recipient, error = %e, "Failed to queue bulk email");
                }
            }
        }

        responses
    }

    /// Current delivery status of a job
    ///
    /// Returns a snapshot; fails with NotFound for an unknown id.
    pub async fn status(&self, id: &str) -> Result<EmailStatus> {
        self.store.get(id).await
    }

    /// Statistics snapshot including current queue depth
    pub async fn stats(&self) -> Stats {
        self.stats.snapshot(self.queue.len().await).await
    }

    /// Static template metadata: names, descriptions and priorities
    pub fn templates(&self) -> TemplateCatalog {
        TemplateCatalog::new()
    }

    /// Shut down the worker pool gracefully
    ///
    /// Workers finish their current job; queued jobs remain unprocessed.
    pub async fn shutdown(self) {
        self.pool.shutdown().await;
    }
}

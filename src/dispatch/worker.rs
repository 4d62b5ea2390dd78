//! Workers draining the job queue
//!
//! A fixed pool of workers pulls jobs off the queue, renders them and hands
//! them to the transport. Failures are absorbed into status updates; a retry
//! is re-enqueued by a detached timer task so the worker never blocks on it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use crate::config::DispatchConfig;
use crate::error::Result;
use crate::queue::{Job, JobQueue};
use crate::stats::StatsRecorder;
use crate::status::StatusStore;
use crate::template::TemplateEngine;
use crate::transport::{OutboundEmail, Transport};

/// A single worker that delivers jobs from the queue
pub struct Worker {
    queue: JobQueue,
    store: StatusStore,
    stats: StatsRecorder,
    engine: Arc<TemplateEngine>,
    transport: Arc<dyn Transport>,
    max_retries: u32,
    retry_delay: Duration,
    worker_id: String,
    shutdown_tx: mpsc::Sender<()>,
}

impl Worker {
    /// Create a new worker
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: JobQueue,
        store: StatusStore,
        stats: StatsRecorder,
        engine: Arc<TemplateEngine>,
        transport: Arc<dyn Transport>,
        max_retries: u32,
        retry_delay: Duration,
        worker_id: String,
    ) -> (Self, mpsc::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        (
            Self {
                queue,
                store,
                stats,
                engine,
                transport,
                max_retries,
                retry_delay,
                worker_id,
                shutdown_tx,
            },
            shutdown_rx,
        )
    }

    /// Start the worker and begin delivering jobs
    ///
    /// This runs until shutdown is requested via the shutdown channel.
    pub async fn start(self, mut shutdown_rx: mpsc::Receiver<()>) {
        tracing::info!(worker_id = %self.worker_id, "Mail worker started");

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!(worker_id = %self.worker_id, "Shutdown signal received, finishing current job...");
                    break;
                }
                processed = self.process_next() => {
                    if processed.is_none() {
                        // No job available, wait a bit before polling again
                        tokio::select! {
                            _ = shutdown_rx.recv() => break,
                            _ = sleep(Duration::from_millis(100)) => {},
                        }
                    }
                }
            }
        }

        tracing::info!(worker_id = %self.worker_id, "Mail worker stopped");
    }

    /// Pull and process the next job, if one is available
    ///
    /// Job failures never escape: they become status updates and, when the
    /// retry budget allows, a scheduled re-enqueue.
    async fn process_next(&self) -> Option<String> {
        let job = self.queue.pop().await?;
        let job_id = job.id.clone();

        tracing::debug!(
            worker_id = %self.worker_id,
            job_id = %job_id,
            template = %job.request.template,
            "Delivering email"
        );

        match self.deliver(&job).await {
            Ok(()) => {
                self.store.mark_sent(&job_id).await;
                self.stats.record_sent().await;
                tracing::info!(
                    worker_id = %self.worker_id,
                    job_id = %job_id,
                    recipient = %job.request.to,
                    "Email sent"
                );
            }
            Err(e) => {
                let reason = e.to_string();
                self.stats.record_failed().await;
                tracing::warn!(
                    worker_id = %self.worker_id,
                    job_id = %job_id,
                    error = %reason,
                    "Email delivery failed"
                );

                if job.retry < self.max_retries {
                    let mut job = job;
                    job.retry += 1;
                    self.store.mark_retrying(&job_id, reason).await;
                    self.schedule_retry(job);
                } else {
                    self.store.mark_failed(&job_id, reason).await;
                }
            }
        }

        Some(job_id)
    }

    /// Render the job's templates and hand the message to the transport
    ///
    /// Render and transport failures are indistinguishable to callers; both
    /// surface as the job's failure reason.
    async fn deliver(&self, job: &Job) -> Result<()> {
        let request = &job.request;
        let content =
            self.engine
                .render(request.template, request.subject.as_deref(), &request.data)?;

        let email = OutboundEmail {
            to: request.to.clone(),
            subject: content.subject,
            text: content.text,
            html: content.html,
            priority: request.priority,
        };

        self.transport.deliver(&email).await
    }

    /// Re-enqueue the job after a delay proportional to its retry count
    ///
    /// Runs as a detached one-shot task; the worker moves on immediately.
    fn schedule_retry(&self, job: Job) {
        let queue = self.queue.clone();
        let store = self.store.clone();
        let delay = self.retry_delay * job.retry;

        tracing::info!(
            job_id = %job.id,
            attempt = job.retry,
            delay_secs = delay.as_secs(),
            "Retry scheduled"
        );

        tokio::spawn(async move {
            sleep(delay).await;
            // Mark before pushing so a worker's later transition wins.
            store.mark_queued(&job.id).await;
            queue.push_waiting(job).await;
        });
    }
}

/// Pool of workers that deliver jobs concurrently
pub struct WorkerPool {
    workers: Vec<tokio::task::JoinHandle<()>>,
    shutdown_txs: Vec<mpsc::Sender<()>>,
}

impl WorkerPool {
    /// Create a new worker pool and spawn its workers
    pub fn new(
        queue: JobQueue,
        store: StatusStore,
        stats: StatsRecorder,
        engine: Arc<TemplateEngine>,
        transport: Arc<dyn Transport>,
        config: &DispatchConfig,
    ) -> Self {
        let mut workers = Vec::new();
        let mut shutdown_txs = Vec::new();

        for i in 0..config.workers {
            let worker_id = format!("worker-{}", i);
            let (worker, shutdown_rx) = Worker::new(
                queue.clone(),
                store.clone(),
                stats.clone(),
                engine.clone(),
                transport.clone(),
                config.max_retries,
                Duration::from_secs(config.retry_delay_seconds),
                worker_id,
            );
            let shutdown_tx = worker.shutdown_tx.clone();

            let handle = tokio::spawn(async move {
                worker.start(shutdown_rx).await;
            });

            workers.push(handle);
            shutdown_txs.push(shutdown_tx);
        }

        Self {
            workers,
            shutdown_txs,
        }
    }

    /// Shutdown all workers gracefully
    ///
    /// Sends shutdown signals to all workers and waits for them to finish
    /// delivering their current jobs.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down worker pool...");

        for shutdown_tx in self.shutdown_txs {
            let _ = shutdown_tx.send(()).await;
        }

        for worker in self.workers {
            let _ = worker.await;
        }

        tracing::info!("Worker pool shut down");
    }
}

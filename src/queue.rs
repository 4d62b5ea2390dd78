//! Bounded in-memory job queue
//!
//! A fixed-capacity FIFO shared between the dispatch facade (producer) and
//! the worker pool (consumers). Submissions use a non-blocking push so a full
//! queue surfaces backpressure to the caller; deferred and retried jobs wait
//! for room instead, matching the original blocking re-enqueue path.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

use crate::error::{MailwayError, Result};
use crate::types::EmailRequest;

/// One unit of work: a single email for a single recipient
///
/// Jobs are moved into the queue by value and owned by whichever worker
/// dequeues them; they are never shared by reference across tasks.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub request: EmailRequest,
    /// Completed retry attempts; monotonically non-decreasing
    pub retry: u32,
}

impl Job {
    pub fn new(id: impl Into<String>, request: EmailRequest) -> Self {
        Self {
            id: id.into(),
            request,
            retry: 0,
        }
    }
}

/// Fixed-capacity FIFO queue of pending send jobs
#[derive(Clone)]
pub struct JobQueue {
    pending: Arc<Mutex<VecDeque<Job>>>,
    capacity: usize,
}

impl JobQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: Arc::new(Mutex::new(VecDeque::new())),
            capacity,
        }
    }

    /// Non-blocking enqueue; fails fast when the queue is at capacity
    pub async fn try_push(&self, job: Job) -> Result<()> {
        let mut pending = self.pending.lock().await;
        if pending.len() >= self.capacity {
            return Err(MailwayError::queue_full("email queue is full"));
        }
        pending.push_back(job);
        Ok(())
    }

    /// Enqueue, waiting for room if the queue is full
    ///
    /// Used by deferred-submission timers and retry tasks, which hold no lock
    /// while waiting and must not drop the job on backpressure.
    pub async fn push_waiting(&self, job: Job) {
        let mut job = Some(job);
        loop {
            {
                let mut pending = self.pending.lock().await;
                if pending.len() < self.capacity {
                    if let Some(job) = job.take() {
                        pending.push_back(job);
                    }
                    return;
                }
            }
            sleep(Duration::from_millis(100)).await;
        }
    }

    /// Dequeue the next job, if any
    pub async fn pop(&self) -> Option<Job> {
        self.pending.lock().await.pop_front()
    }

    /// Current queue depth
    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

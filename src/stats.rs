//! Aggregate delivery statistics
//!
//! Running counters shared by every worker and every submission, guarded by
//! a reader-writer lock. Queue depth is not stored; it is read from the
//! queue at snapshot time and merged into the returned copy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Point-in-time statistics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total_sent: u64,
    pub total_failed: u64,
    pub total_pending: u64,
    pub total_queued: u64,
    /// Queue depth at snapshot time
    pub queue_size: usize,
    pub workers: usize,
    pub start_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

#[derive(Clone)]
pub struct StatsRecorder {
    inner: Arc<RwLock<Stats>>,
}

impl StatsRecorder {
    pub fn new(workers: usize) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(RwLock::new(Stats {
                total_sent: 0,
                total_failed: 0,
                total_pending: 0,
                total_queued: 0,
                queue_size: 0,
                workers,
                start_time: now,
                last_activity: now,
            })),
        }
    }

    /// A submission was accepted: one pending record, one queued job
    pub async fn record_submitted(&self) {
        let mut stats = self.inner.write().await;
        stats.total_pending += 1;
        stats.total_queued += 1;
        stats.last_activity = Utc::now();
    }

    pub async fn record_sent(&self) {
        let mut stats = self.inner.write().await;
        stats.total_sent += 1;
        stats.last_activity = Utc::now();
    }

    /// Counts every failed attempt, including ones that will be retried
    pub async fn record_failed(&self) {
        let mut stats = self.inner.write().await;
        stats.total_failed += 1;
        stats.last_activity = Utc::now();
    }

    /// Snapshot the counters, merging in the current queue depth
    pub async fn snapshot(&self, queue_size: usize) -> Stats {
        let mut stats = self.inner.read().await.clone();
        stats.queue_size = queue_size;
        stats
    }
}

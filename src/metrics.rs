use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing controller activity for one session.
#[derive(Default)]
pub struct SessionMetrics {
    files_uploaded: AtomicU64,
    files_failed: AtomicU64,
    summaries_applied: AtomicU64,
    chats_applied: AtomicU64,
    documents_deleted: AtomicU64,
    stale_results_discarded: AtomicU64,
}

impl SessionMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the per-file results of one upload batch.
    pub fn record_upload_batch(&self, succeeded: u64, failed: u64) {
        self.files_uploaded.fetch_add(succeeded, Ordering::Relaxed);
        self.files_failed.fetch_add(failed, Ordering::Relaxed);
    }

    /// Record a summary that was applied to the state.
    pub fn record_summary(&self) {
        self.summaries_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a chat answer that was applied to the state.
    pub fn record_chat(&self) {
        self.chats_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful backend deletion.
    pub fn record_deletion(&self) {
        self.documents_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dispatch result dropped because the selection moved on.
    pub fn record_discarded(&self) {
        self.stale_results_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            files_uploaded: self.files_uploaded.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            summaries_applied: self.summaries_applied.load(Ordering::Relaxed),
            chats_applied: self.chats_applied.load(Ordering::Relaxed),
            documents_deleted: self.documents_deleted.load(Ordering::Relaxed),
            stale_results_discarded: self.stale_results_discarded.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of session counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Files accepted by the backend.
    pub files_uploaded: u64,
    /// Files rejected by the backend or unreachable.
    pub files_failed: u64,
    /// Summaries written into the controller state.
    pub summaries_applied: u64,
    /// Chat answers written into the controller state.
    pub chats_applied: u64,
    /// Documents removed from the backend.
    pub documents_deleted: u64,
    /// Summary or chat results dropped because the selection changed while in flight.
    pub stale_results_discarded: u64,
}

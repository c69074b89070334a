// file: src/pipeline/stats.rs
// description: counters for publishing attempts and the shutdown summary
// reference: atomic counters shared across worker tasks

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub files_published: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub archive_failures: usize,
    pub readiness_timeouts: usize,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.files_published + self.files_failed + self.files_skipped
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.files_published + self.files_failed;
        if total == 0 {
            return 0.0;
        }
        (self.files_published as f64 / total as f64) * 100.0
    }
}

/// Lock-free counters updated by every worker task.
pub struct StatsTracker {
    files_published: AtomicUsize,
    files_failed: AtomicUsize,
    files_skipped: AtomicUsize,
    archive_failures: AtomicUsize,
    readiness_timeouts: AtomicUsize,
    start_time: Instant,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            files_published: AtomicUsize::new(0),
            files_failed: AtomicUsize::new(0),
            files_skipped: AtomicUsize::new(0),
            archive_failures: AtomicUsize::new(0),
            readiness_timeouts: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_published(&self) {
        self.files_published.fetch_add(1, Ordering::SeqCst);
    }

    pub fn inc_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn inc_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::SeqCst);
    }

    pub fn inc_archive_failures(&self) {
        self.archive_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub fn inc_readiness_timeouts(&self) {
        self.readiness_timeouts.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            files_published: self.files_published.load(Ordering::SeqCst),
            files_failed: self.files_failed.load(Ordering::SeqCst),
            files_skipped: self.files_skipped.load(Ordering::SeqCst),
            archive_failures: self.archive_failures.load(Ordering::SeqCst),
            readiness_timeouts: self.readiness_timeouts.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

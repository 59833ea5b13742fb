use std::sync::atomic::{AtomicU64, Ordering};

/// Told about every finished job. Implementations must return promptly;
/// they run on the worker that just completed the job.
pub trait ProgressObserver: Send + Sync {
    fn on_complete(&self, sequence: u64, total: u64);
}

/// Observer that ignores progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_complete(&self, _sequence: u64, _total: u64) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub completed: u64,
    pub total: u64,
    /// Highest sequence label seen so far.
    pub last_sequence: u64,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn percent(&self) -> u64 {
        self.completed
            .saturating_mul(100)
            .checked_div(self.total)
            .unwrap_or(0)
            .min(100)
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// Lock-free counters a renderer can poll.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    completed: AtomicU64,
    total: AtomicU64,
    last_sequence: AtomicU64,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self {
            completed: AtomicU64::new(0),
            total: AtomicU64::new(total),
            last_sequence: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            completed: self.completed.load(Ordering::Acquire),
            total: self.total.load(Ordering::Acquire),
            last_sequence: self.last_sequence.load(Ordering::Acquire),
        }
    }
}

impl ProgressObserver for ProgressTracker {
    fn on_complete(&self, sequence: u64, total: u64) {
        self.total.store(total, Ordering::Release);
        self.last_sequence.fetch_max(sequence, Ordering::AcqRel);
        self.completed.fetch_add(1, Ordering::AcqRel);
    }
}

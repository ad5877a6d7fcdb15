use std::sync::atomic::{AtomicU64, Ordering};

/// Run-wide tallies, read once after every worker has been joined.
#[derive(Debug, Default)]
pub struct Counters {
    total: AtomicU64,
    succeeded: AtomicU64,
    // Includes calls cancelled in flight.
    failed: AtomicU64,
    skipped: AtomicU64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_submitted(&self) -> u64 {
        self.total.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn record_success(&self) -> u64 {
        self.succeeded.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn record_failure(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn record_skipped(&self) -> u64 {
        self.skipped.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn processed(&self) -> u64 {
        self.succeeded() + self.failed() + self.skipped()
    }
}

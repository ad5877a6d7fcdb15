use std::fmt;
use std::time::Duration;

use super::counters::Counters;
use super::reporter::throughput;

/// Final tallies of a run, read once every worker has returned.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
    pub elapsed: Duration,
    /// Caller cancellation cut work short.
    pub interrupted: bool,
}

impl RunSummary {
    pub fn from_counters(counters: &Counters, elapsed: Duration, interrupted: bool) -> Self {
        Self {
            total: counters.total(),
            succeeded: counters.succeeded(),
            failed: counters.failed(),
            skipped: counters.skipped(),
            elapsed,
            interrupted,
        }
    }

    pub fn qps(&self) -> f64 {
        throughput(self.succeeded, self.elapsed)
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} succeed.", self.succeeded, self.total)
    }
}

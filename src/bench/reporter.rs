use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Endpoint;

#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub endpoint: Endpoint,
    pub succeeded: u64,
    pub elapsed: Duration,
    pub qps: f64,
    pub latency: Duration,
    pub symbol: String,
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "successfully fetched {} for {} symbols, QPS = {:.2}, request time {} ms for last symbol {}",
            self.endpoint.describe(),
            self.succeeded,
            self.qps,
            self.latency.as_millis(),
            self.symbol
        )
    }
}

pub type ReportSink = Arc<dyn Fn(&ProgressReport) + Send + Sync>;

pub fn stdout_sink() -> ReportSink {
    Arc::new(|report: &ProgressReport| println!("{report}"))
}

/// Best-effort: no lock is taken, so concurrent reports may overlap.
#[derive(Clone)]
pub struct ProgressReporter {
    endpoint: Endpoint,
    every: u64,
    start: Instant,
    sink: ReportSink,
}

impl ProgressReporter {
    pub fn new(endpoint: Endpoint, every: u64, start: Instant, sink: ReportSink) -> Self {
        Self {
            endpoint,
            every: every.max(1),
            start,
            sink,
        }
    }

    /// Emit a report when `succeeded` is a positive multiple of the interval.
    pub fn observe(&self, succeeded: u64, latency: Duration, symbol: &str) -> bool {
        if succeeded == 0 || succeeded % self.every != 0 {
            return false;
        }

        let elapsed = self.start.elapsed();
        let report = ProgressReport {
            endpoint: self.endpoint,
            succeeded,
            elapsed,
            qps: throughput(succeeded, elapsed),
            latency,
            symbol: symbol.to_string(),
        };
        (self.sink)(&report);
        true
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("endpoint", &self.endpoint)
            .field("every", &self.every)
            .field("start", &self.start)
            .finish()
    }
}

/// Operations per second, zero when no time has passed.
pub fn throughput(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn collecting_sink() -> (ReportSink, Arc<Mutex<Vec<ProgressReport>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let sink: ReportSink = Arc::new(move |report: &ProgressReport| {
            sink_seen.lock().unwrap().push(report.clone());
        });
        (sink, seen)
    }

    #[test]
    fn reports_only_on_boundaries() {
        let (sink, seen) = collecting_sink();
        let reporter = ProgressReporter::new(Endpoint::Quote, 100, Instant::now(), sink);

        assert!(!reporter.observe(0, Duration::ZERO, "AAPL"));
        assert!(!reporter.observe(99, Duration::ZERO, "AAPL"));
        assert!(reporter.observe(100, Duration::from_millis(42), "AAPL"));
        assert!(!reporter.observe(101, Duration::ZERO, "AAPL"));
        assert!(reporter.observe(200, Duration::ZERO, "AAPL"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].succeeded, 100);
        assert_eq!(seen[0].latency, Duration::from_millis(42));
        assert!(seen[1].qps >= 0.0);
    }

    #[test]
    fn formats_progress_line() {
        let report = ProgressReport {
            endpoint: Endpoint::Profile,
            succeeded: 300,
            elapsed: Duration::from_secs(2),
            qps: 150.0,
            latency: Duration::from_millis(87),
            symbol: "AAPL".to_string(),
        };

        assert_eq!(
            report.to_string(),
            "successfully fetched name for 300 symbols, QPS = 150.00, request time 87 ms for last symbol AAPL"
        );
    }

    #[test]
    fn throughput_handles_zero_elapsed() {
        assert_eq!(throughput(10, Duration::ZERO), 0.0);
        assert!((throughput(10, Duration::from_secs(2)) - 5.0).abs() < 1e-9);
    }
}

//! Bounded-concurrency benchmark harness.
//!
//! A generator feeds a bounded queue, a fixed pool of workers drains it through
//! an injected [`Operation`](crate::fetch::Operation), and progress is reported
//! inline by whichever worker lands on a reporting boundary.

pub mod counters;
pub mod generator;
pub mod pool;
pub mod reporter;
pub mod summary;

pub use counters::Counters;
pub use generator::submit_items;
pub use pool::Harness;
pub use reporter::{stdout_sink, ProgressReport, ProgressReporter, ReportSink};
pub use summary::RunSummary;

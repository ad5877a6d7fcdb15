use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::{BenchConfig, Endpoint, FailurePolicy};
use crate::error::{AppError, Result};
use crate::fetch::Operation;

use super::counters::Counters;
use super::generator::submit_items;
use super::reporter::{stdout_sink, ProgressReporter, ReportSink};
use super::summary::RunSummary;

type SharedQueue = Arc<AsyncMutex<mpsc::Receiver<String>>>;

struct WorkerContext {
    endpoint: Endpoint,
    queue: SharedQueue,
    counters: Arc<Counters>,
    operation: Arc<dyn Operation>,
    reporter: ProgressReporter,
    policy: FailurePolicy,
    cancel: CancellationToken,
    first_failure: Mutex<Option<(String, AppError)>>,
    // Set once an item is skipped or cancelled mid-call.
    cut_short: AtomicBool,
}

/// Runs one benchmark: a generator, a bounded queue and a fixed pool of workers.
pub struct Harness {
    config: BenchConfig,
    operation: Arc<dyn Operation>,
    sink: ReportSink,
}

impl Harness {
    pub fn new(config: BenchConfig, operation: Arc<dyn Operation>) -> Self {
        Self {
            config,
            operation,
            sink: stdout_sink(),
        }
    }

    pub fn with_sink(mut self, sink: ReportSink) -> Self {
        self.sink = sink;
        self
    }

    /// Drive the whole run and wait for every worker to return.
    ///
    /// The summary is flagged interrupted only when cancelling `cancel` actually
    /// cut work short. Under [`FailurePolicy::FailFast`] the first failure
    /// cancels the run internally and the run returns [`AppError::Aborted`].
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunSummary> {
        let start = Instant::now();
        let run_token = cancel.child_token();
        let counters = Arc::new(Counters::new());

        let (tx, rx) = mpsc::channel::<String>(self.config.queue_capacity.max(1));
        let queue: SharedQueue = Arc::new(AsyncMutex::new(rx));

        let context = Arc::new(WorkerContext {
            endpoint: self.config.endpoint,
            queue,
            counters: Arc::clone(&counters),
            operation: Arc::clone(&self.operation),
            reporter: ProgressReporter::new(
                self.config.endpoint,
                self.config.report_every,
                start,
                Arc::clone(&self.sink),
            ),
            policy: self.config.failure_policy,
            cancel: run_token.clone(),
            first_failure: Mutex::new(None),
            cut_short: AtomicBool::new(false),
        });

        let worker_count = self.config.worker_count.max(1);
        log::info!(
            "starting {} run: {} items over {} workers",
            self.config.endpoint,
            self.config.item_count,
            worker_count
        );

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            workers.spawn(worker_loop(worker_id, Arc::clone(&context)));
        }

        let generator = submit_items(
            tx,
            &self.config.symbols,
            self.config.item_count,
            &counters,
            &run_token,
        );
        let barrier = async {
            let mut join_error = None;
            while let Some(joined) = workers.join_next().await {
                if let Err(err) = joined {
                    log::error!("worker task failed: {err}");
                    // The queue may have no consumers left; unblock the generator.
                    run_token.cancel();
                    join_error.get_or_insert(err);
                }
            }
            join_error
        };
        let (submitted, join_error) = tokio::join!(generator, barrier);
        if let Some(err) = join_error {
            return Err(AppError::Join(err));
        }

        let interrupted = cancel.is_cancelled()
            && (submitted < self.config.item_count
                || context.cut_short.load(Ordering::Relaxed));
        let summary = RunSummary::from_counters(&counters, start.elapsed(), interrupted);
        log::info!(
            "run finished in {:.2}s: {} succeeded, {} failed, {} skipped, QPS = {:.2}",
            summary.elapsed.as_secs_f64(),
            summary.succeeded,
            summary.failed,
            summary.skipped,
            summary.qps()
        );

        let first_failure = context
            .first_failure
            .lock()
            .map_err(|_| AppError::message("failure slot poisoned"))?
            .take();
        match first_failure {
            Some((symbol, source)) => Err(AppError::Aborted {
                symbol,
                source: Box::new(source),
            }),
            None => Ok(summary),
        }
    }
}

async fn worker_loop(worker_id: usize, ctx: Arc<WorkerContext>) {
    loop {
        let next = {
            let mut queue = ctx.queue.lock().await;
            queue.recv().await
        };
        let Some(symbol) = next else {
            break;
        };

        if ctx.cancel.is_cancelled() {
            ctx.counters.record_skipped();
            ctx.cut_short.store(true, Ordering::Relaxed);
            continue;
        }

        let begin = Instant::now();
        match ctx.operation.call(&ctx.cancel, &symbol).await {
            Ok(value) => {
                let succeeded = ctx.counters.record_success();
                let latency = begin.elapsed();
                log::debug!(
                    "worker {worker_id}: {} {symbol} = {value} in {} ms",
                    ctx.endpoint,
                    latency.as_millis()
                );
                ctx.reporter.observe(succeeded, latency, &symbol);
            }
            Err(err) => {
                ctx.counters.record_failure();
                if err.is_cancelled() && ctx.cancel.is_cancelled() {
                    ctx.cut_short.store(true, Ordering::Relaxed);
                    log::debug!("worker {worker_id}: {symbol} cancelled in flight");
                    continue;
                }

                log::warn!("worker {worker_id}: {} failed for {symbol}: {err}", ctx.endpoint);
                if matches!(ctx.policy, FailurePolicy::FailFast) {
                    record_first_failure(&ctx, symbol, err);
                    ctx.cancel.cancel();
                }
            }
        }
    }
}

fn record_first_failure(ctx: &WorkerContext, symbol: String, err: AppError) {
    if let Ok(mut slot) = ctx.first_failure.lock() {
        if slot.is_none() {
            *slot = Some((symbol, err));
        }
    }
}

use std::sync::Arc;

use tokio::task::JoinHandle;

use tokio_util::sync::CancellationToken;

use crate::bench::{stdout_sink, Harness, RunSummary};
use crate::cli::{show_banner, Cli};
use crate::config::{load_config_file, validate_config, BenchConfig};
use crate::error::{AppError, Result};
use crate::fetch::FinnhubOperation;

/// Layer built-in defaults, the optional config file and command-line flags.
pub fn resolve_config(cli: &Cli) -> Result<BenchConfig> {
    let mut config = BenchConfig::builtin();
    if let Some(path) = &cli.config {
        config.apply(load_config_file(path)?);
    }
    config.apply(cli.overrides());
    validate_config(&config)?;
    Ok(config)
}

/// Entry point used by `main`: configure, run the benchmark, print the summary.
pub async fn run(cli: Cli) -> Result<RunSummary> {
    let config = resolve_config(&cli)?;
    show_banner(config.endpoint, config.worker_count, config.item_count);

    let operation = Arc::new(FinnhubOperation::from_config(&config));
    // Credential and client problems are fatal before any work is queued.
    operation.warm_up().await?;

    let cancel = CancellationToken::new();
    let done = CancellationToken::new();
    // Releases the listener on every return path below.
    let _listener_guard = done.clone().drop_guard();
    spawn_interrupt_listener(cancel.clone(), done);

    let harness = Harness::new(config, operation).with_sink(stdout_sink());
    let summary = harness.run(&cancel).await?;

    println!("{summary}");
    if summary.interrupted {
        log::warn!(
            "run interrupted: {} item(s) drained without a request",
            summary.skipped
        );
        return Err(AppError::Cancelled);
    }

    Ok(summary)
}

/// Cancel `cancel` on Ctrl-C; the task exits once either token is cancelled.
fn spawn_interrupt_listener(cancel: CancellationToken, done: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = done.cancelled() => {}
            _ = cancel.cancelled() => {}
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    log::warn!("interrupt received, draining remaining work");
                    cancel.cancel();
                }
                Err(err) => log::error!("failed to listen for interrupt: {err}"),
            },
        }
    })
}

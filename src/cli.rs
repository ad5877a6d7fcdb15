use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigOverrides, Endpoint, FailurePolicy};
use crate::utils::current_human_timestamp;

#[derive(Parser, Debug)]
#[command(name = "finnhub-bench")]
#[command(about = "Measure throughput and success rate of the Finnhub stock API")]
#[command(version)]
pub struct Cli {
    /// Finnhub endpoint [quote|candle|bf|profile] (default: quote)
    #[arg(short, long)]
    pub endpoint: Option<Endpoint>,

    /// JSON file with run settings; command-line flags win over it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Total number of requests to issue
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Symbol to request; repeat to cycle through several
    #[arg(short, long = "symbol")]
    pub symbols: Vec<String>,

    /// Print a progress line every N successes
    #[arg(long)]
    pub report_every: Option<u64>,

    /// Capacity of the work queue between generator and workers
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Abort the whole run on the first failed request
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// File holding the Finnhub API key
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    /// Base URL of the Finnhub REST API
    #[arg(long)]
    pub base_url: Option<String>,
}

impl Cli {
    /// Flags the user actually passed, as overrides for the loaded configuration.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            endpoint: self.endpoint,
            worker_count: self.workers,
            item_count: self.count,
            symbols: (!self.symbols.is_empty()).then(|| self.symbols.clone()),
            report_every: self.report_every,
            queue_capacity: self.queue_capacity,
            failure_policy: self.fail_fast.then_some(FailurePolicy::FailFast),
            timeout_secs: self.timeout_secs,
            key_file: self.key_file.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

pub fn show_banner(endpoint: Endpoint, workers: usize, count: u64) {
    println!("# ------------------------------------------------------------------------ #");
    println!("# Finnhub API benchmark");
    println!("# Executing date: {}", current_human_timestamp());
    println!("#");
    println!("#   endpoint:  {}", endpoint);
    println!("#   workers:   {}", workers);
    println!("#   requests:  {}", count);
    println!("# ------------------------------------------------------------------------ #");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BenchConfig;

    #[test]
    fn parses_endpoint_flag() {
        let cli = Cli::parse_from(["finnhub-bench", "--endpoint", "bf"]);
        assert_eq!(cli.endpoint, Some(Endpoint::Bf));
    }

    #[test]
    fn defaults_leave_builtin_config_alone() {
        let cli = Cli::parse_from(["finnhub-bench"]);
        let mut config = BenchConfig::builtin();
        config.apply(cli.overrides());

        assert_eq!(config.endpoint, Endpoint::Quote);
        assert_eq!(config.worker_count, 1000);
        assert!(!config.is_fail_fast());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "finnhub-bench",
            "-e",
            "profile",
            "-w",
            "20",
            "-n",
            "500",
            "-s",
            "AAPL",
            "-s",
            "MSFT",
            "--fail-fast",
        ]);
        let mut config = BenchConfig::builtin();
        config.apply(cli.overrides());

        assert_eq!(config.endpoint, Endpoint::Profile);
        assert_eq!(config.worker_count, 20);
        assert_eq!(config.item_count, 500);
        assert_eq!(config.symbols, vec!["AAPL", "MSFT"]);
        assert!(config.is_fail_fast());
    }

    #[test]
    fn rejects_unknown_endpoint() {
        assert!(Cli::try_parse_from(["finnhub-bench", "--endpoint", "news"]).is_err());
    }
}

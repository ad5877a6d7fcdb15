use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub mod loader;
pub mod validator;

pub use loader::{load_config_file, ConfigOverrides};
pub use validator::validate_config;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_KEY_FILE: &str = "/var/keychain/finnhub.key";

/// Vendor endpoint exercised by every worker during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    #[default]
    Quote,
    Candle,
    Bf,
    Profile,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Quote => "quote",
            Endpoint::Candle => "candle",
            Endpoint::Bf => "bf",
            Endpoint::Profile => "profile",
        }
    }

    /// Noun used in progress lines, e.g. "successfully fetched quote for 100 symbols".
    pub fn describe(self) -> &'static str {
        match self {
            Endpoint::Quote => "quote",
            Endpoint::Candle => "candles",
            Endpoint::Bf => "basic financials",
            Endpoint::Profile => "name",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quote" => Ok(Endpoint::Quote),
            "candle" | "candles" => Ok(Endpoint::Candle),
            "bf" => Ok(Endpoint::Bf),
            "profile" => Ok(Endpoint::Profile),
            other => Err(AppError::Config(format!(
                "unknown endpoint `{other}`, expected one of quote|candle|bf|profile"
            ))),
        }
    }
}

/// What a worker does when the operation returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Count the failure and keep draining the queue.
    #[default]
    FailSoft,
    /// Abort the whole run on the first failure.
    FailFast,
}

/// Runtime settings for a single benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub endpoint: Endpoint,
    pub worker_count: usize,
    pub item_count: u64,
    pub symbols: Vec<String>,
    pub report_every: u64,
    pub queue_capacity: usize,
    pub failure_policy: FailurePolicy,
    pub request_timeout: Duration,
    pub key_file: PathBuf,
    pub base_url: String,
}

impl BenchConfig {
    pub fn builtin() -> Self {
        Self {
            endpoint: Endpoint::Quote,
            worker_count: 1000,
            item_count: 100_000,
            symbols: vec!["AAPL".to_string()],
            report_every: 100,
            queue_capacity: 10,
            failure_policy: FailurePolicy::FailSoft,
            request_timeout: Duration::from_secs(10),
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn is_fail_fast(&self) -> bool {
        matches!(self.failure_policy, FailurePolicy::FailFast)
    }

    /// Apply overrides on top of the current values; unset fields are left alone.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(workers) = overrides.worker_count {
            self.worker_count = workers;
        }
        if let Some(count) = overrides.item_count {
            self.item_count = count;
        }
        if let Some(symbols) = overrides.symbols {
            if !symbols.is_empty() {
                self.symbols = symbols;
            }
        }
        if let Some(every) = overrides.report_every {
            self.report_every = every;
        }
        if let Some(capacity) = overrides.queue_capacity {
            self.queue_capacity = capacity;
        }
        if let Some(policy) = overrides.failure_policy {
            self.failure_policy = policy;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = overrides.key_file {
            self.key_file = path;
        }
        if let Some(url) = overrides.base_url {
            self.base_url = url;
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

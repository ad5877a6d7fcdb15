use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::{BenchConfig, Endpoint};
use crate::error::{AppError, Context};

use super::auth::{resolve_api_key, SharedClient};
use super::decode::decode_payload;
use super::request::{build_headers, prepare_request};
use super::{FetchResult, Operation};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin async client over the Finnhub REST endpoints used by the benchmark.
#[derive(Debug, Clone)]
pub struct FinnhubClient {
    client: Client,
    base_url: String,
}

impl FinnhubClient {
    pub fn new(base_url: impl Into<String>, api_key: &str, max_idle: usize) -> FetchResult<Self> {
        let client = Client::builder()
            .default_headers(build_headers(api_key)?)
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_max_idle_per_host(max_idle)
            .build()
            .context("Failed to construct vendor HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Issue one request and reduce the response to its reported value.
    pub async fn fetch(&self, endpoint: Endpoint, symbol: &str) -> FetchResult<String> {
        let prepared = prepare_request(&self.base_url, endpoint, symbol, Utc::now());

        let response = self
            .client
            .get(&prepared.url)
            .query(&prepared.query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status,
                symbol: symbol.to_string(),
            });
        }

        let payload: Value = response.json().await?;
        decode_payload(endpoint, symbol, &payload)
    }
}

/// The vendor call the harness runs per item: one endpoint, a lazily built client.
pub struct FinnhubOperation {
    endpoint: Endpoint,
    key_file: PathBuf,
    base_url: String,
    request_timeout: Duration,
    max_idle: usize,
    client: Arc<SharedClient<FinnhubClient>>,
}

impl FinnhubOperation {
    pub fn from_config(config: &BenchConfig) -> Self {
        Self::with_shared_client(config, Arc::new(SharedClient::new()))
    }

    pub fn with_shared_client(
        config: &BenchConfig,
        client: Arc<SharedClient<FinnhubClient>>,
    ) -> Self {
        Self {
            endpoint: config.endpoint,
            key_file: config.key_file.clone(),
            base_url: config.base_url.clone(),
            request_timeout: config.request_timeout,
            max_idle: config.worker_count,
            client,
        }
    }

    /// Build the shared client now so credential problems surface before any work starts.
    pub async fn warm_up(&self) -> FetchResult<()> {
        self.client().await.map(|_| ())
    }

    async fn client(&self) -> FetchResult<Arc<FinnhubClient>> {
        self.client
            .get(|| async {
                let key = resolve_api_key(&self.key_file)?;
                log::info!("constructing vendor client for {}", self.base_url);
                FinnhubClient::new(self.base_url.clone(), &key, self.max_idle)
            })
            .await
    }

    async fn call_once(&self, cancel: &CancellationToken, symbol: &str) -> FetchResult<String> {
        let client = self.client().await?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled),
            result = tokio::time::timeout(self.request_timeout, client.fetch(self.endpoint, symbol)) => {
                match result {
                    Ok(outcome) => outcome,
                    Err(_) => Err(AppError::Timeout { symbol: symbol.to_string() }),
                }
            }
        }
    }
}

impl Operation for FinnhubOperation {
    fn call<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        symbol: &'a str,
    ) -> BoxFuture<'a, FetchResult<String>> {
        self.call_once(cancel, symbol).boxed()
    }
}

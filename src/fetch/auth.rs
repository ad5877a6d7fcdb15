use std::fmt::Debug;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::{AppError, Context, Result};

/// Environment variable that takes precedence over the key file.
pub const API_KEY_ENV: &str = "FINNHUB_API_KEY";

/// Read the vendor API key, preferring the environment over the key file.
pub fn resolve_api_key(path: &Path) -> Result<String> {
    match std::env::var(API_KEY_ENV) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => read_api_key(path),
    }
}

/// Read the key file and strip the trailing newline.
pub fn read_api_key(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read API key file {}", path.display()))?;

    let key = raw.trim_end_matches(['\n', '\r']);
    if key.is_empty() {
        return Err(AppError::message(format!(
            "API key file {} is empty",
            path.display()
        )));
    }

    Ok(key.to_string())
}

/// Lazily constructed value shared by every worker.
///
/// The constructor runs at most once even when many tasks race on the first
/// access; a failed construction is not cached, so a later caller retries.
pub struct SharedClient<T> {
    cell: OnceCell<Arc<T>>,
}

impl<T> SharedClient<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// Return the shared value, building it with `init` on first access.
    pub async fn get<F, Fut>(&self, init: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let value = self
            .cell
            .get_or_try_init(|| async { init().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(value))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

impl<T> Default for SharedClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for SharedClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedClient")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

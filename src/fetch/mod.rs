use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

pub mod auth;
pub mod client;
pub mod decode;
pub mod request;

pub use auth::{read_api_key, SharedClient};
pub use client::{FinnhubClient, FinnhubOperation};

pub type FetchResult<T> = Result<T>;

/// A single unit of work the harness runs once per item.
///
/// Implementations must return promptly with [`crate::AppError::Cancelled`] once
/// `cancel` fires.
pub trait Operation: Send + Sync {
    fn call<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        symbol: &'a str,
    ) -> BoxFuture<'a, FetchResult<String>>;
}

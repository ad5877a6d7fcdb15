use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error("field `{field}` is missing in the response for symbol {symbol}")]
    MissingField { field: &'static str, symbol: String },
    #[error("request for symbol {symbol} failed with status {status}")]
    Status {
        status: reqwest::StatusCode,
        symbol: String,
    },
    #[error("request for symbol {symbol} timed out")]
    Timeout { symbol: String },
    #[error("operation cancelled")]
    Cancelled,
    #[error("run aborted after failure on symbol {symbol}: {source}")]
    Aborted {
        symbol: String,
        #[source]
        source: Box<AppError>,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    pub fn missing_field(field: &'static str, symbol: &str) -> Self {
        AppError::MissingField {
            field,
            symbol: symbol.to_string(),
        }
    }

    /// True for errors produced by the run being cancelled rather than by the vendor.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

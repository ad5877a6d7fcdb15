use chrono::{DateTime, Duration, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

use crate::config::Endpoint;
use crate::error::Context;

use super::FetchResult;

pub const TOKEN_HEADER: &str = "X-Finnhub-Token";
pub const CANDLE_RESOLUTION: &str = "15";
pub const CANDLE_WINDOW_HOURS: i64 = 24;
pub const BASIC_FINANCIALS_METRIC: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
}

/// Build the path and query string for one endpoint call.
pub fn prepare_request(
    base_url: &str,
    endpoint: Endpoint,
    symbol: &str,
    now: DateTime<Utc>,
) -> PreparedRequest {
    let base = base_url.trim_end_matches('/');
    let symbol = symbol.to_string();

    let (path, query) = match endpoint {
        Endpoint::Quote => ("quote", vec![("symbol", symbol)]),
        Endpoint::Candle => {
            let from = now - Duration::hours(CANDLE_WINDOW_HOURS);
            (
                "stock/candle",
                vec![
                    ("symbol", symbol),
                    ("resolution", CANDLE_RESOLUTION.to_string()),
                    ("from", from.timestamp().to_string()),
                    ("to", now.timestamp().to_string()),
                ],
            )
        }
        Endpoint::Bf => (
            "stock/metric",
            vec![
                ("symbol", symbol),
                ("metric", BASIC_FINANCIALS_METRIC.to_string()),
            ],
        ),
        Endpoint::Profile => ("stock/profile2", vec![("symbol", symbol)]),
    };

    PreparedRequest {
        url: format!("{base}/{path}"),
        query,
    }
}

/// Default headers attached to every request made by the vendor client.
pub fn build_headers(api_key: &str) -> FetchResult<HeaderMap> {
    let mut map = HeaderMap::new();
    let name = HeaderName::from_static("x-finnhub-token");
    let mut value = HeaderValue::from_str(api_key)
        .with_context(|| format!("Invalid header value for {}", TOKEN_HEADER))?;
    value.set_sensitive(true);
    map.insert(name, value);
    map.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(map)
}

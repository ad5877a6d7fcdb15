use serde_json::Value;

use crate::config::Endpoint;
use crate::error::AppError;

use super::FetchResult;

/// Key read from the basic-financials `metric` map.
pub const BASIC_FINANCIALS_FIELD: &str = "52WeekHigh";

/// Reduce a vendor payload to the single value the benchmark reports.
pub fn decode_payload(endpoint: Endpoint, symbol: &str, root: &Value) -> FetchResult<String> {
    match endpoint {
        Endpoint::Quote => decode_quote(symbol, root),
        Endpoint::Candle => decode_candles(symbol, root),
        Endpoint::Bf => decode_basic_financials(symbol, root),
        Endpoint::Profile => decode_profile(symbol, root),
    }
}

pub fn decode_quote(symbol: &str, root: &Value) -> FetchResult<String> {
    let current = root
        .get("c")
        .and_then(as_number)
        .ok_or_else(|| AppError::missing_field("c", symbol))?;
    Ok(format_price(current))
}

pub fn decode_candles(symbol: &str, root: &Value) -> FetchResult<String> {
    let first_close = root
        .get("c")
        .and_then(Value::as_array)
        .and_then(|closes| closes.first())
        .and_then(as_number)
        .ok_or_else(|| AppError::missing_field("c", symbol))?;
    Ok(format_price(first_close))
}

pub fn decode_basic_financials(symbol: &str, root: &Value) -> FetchResult<String> {
    let metric = root
        .get("metric")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::missing_field("metric", symbol))?;

    // An absent 52-week high is reported as an empty value, not a failure.
    Ok(metric
        .get(BASIC_FINANCIALS_FIELD)
        .map(value_to_string)
        .unwrap_or_default())
}

pub fn decode_profile(symbol: &str, root: &Value) -> FetchResult<String> {
    root.get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::missing_field("name", symbol))
}

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_quote_current_price() {
        let payload = json!({"c": 189.843, "d": 1.2, "dp": 0.64, "h": 190.3, "l": 187.9});
        assert_eq!(decode_quote("AAPL", &payload).unwrap(), "189.84");
    }

    #[test]
    fn quote_without_current_price_names_the_symbol() {
        let payload = json!({"d": null});
        let err = decode_quote("AAPL", &payload).expect_err("should fail");
        assert!(
            matches!(&err, AppError::MissingField { field: "c", symbol } if symbol == "AAPL"),
            "unexpected error: {err:?}"
        );
        assert!(err.to_string().contains("`c`"), "unexpected error message: {err}");
    }

    #[test]
    fn decodes_first_candle_close() {
        let payload = json!({
            "c": [182.5, 183.25, 184.0],
            "o": [182.0, 182.5, 183.25],
            "s": "ok",
            "t": [1709290800, 1709291700, 1709292600]
        });
        assert_eq!(decode_candles("AAPL", &payload).unwrap(), "182.50");
    }

    #[test]
    fn no_data_candle_payload_is_missing_field() {
        let payload = json!({"s": "no_data"});
        assert!(matches!(
            decode_candles("AAPL", &payload),
            Err(AppError::MissingField { field: "c", .. })
        ));

        let empty = json!({"c": [], "s": "ok"});
        assert!(matches!(
            decode_candles("AAPL", &empty),
            Err(AppError::MissingField { field: "c", .. })
        ));
    }

    #[test]
    fn extracts_week_high_from_basic_financials() {
        let payload = json!({
            "metric": {"52WeekHigh": 199.62, "52WeekLow": 143.9},
            "metricType": "all",
            "symbol": "AAPL"
        });
        assert_eq!(decode_basic_financials("AAPL", &payload).unwrap(), "199.62");

        let without_high = json!({"metric": {"beta": 1.29}});
        assert_eq!(decode_basic_financials("AAPL", &without_high).unwrap(), "");
    }

    #[test]
    fn basic_financials_without_metric_map_fails() {
        let payload = json!({"series": {}});
        assert!(matches!(
            decode_basic_financials("AAPL", &payload),
            Err(AppError::MissingField { field: "metric", .. })
        ));
    }

    #[test]
    fn decodes_profile_name() {
        let payload = json!({"country": "US", "name": "Apple Inc", "ticker": "AAPL"});
        assert_eq!(decode_profile("AAPL", &payload).unwrap(), "Apple Inc");

        // Unknown symbols come back as an empty object.
        assert!(matches!(
            decode_profile("ZZZZ", &json!({})),
            Err(AppError::MissingField { field: "name", .. })
        ));
        assert!(matches!(
            decode_profile("ZZZZ", &json!({"name": "  "})),
            Err(AppError::MissingField { field: "name", .. })
        ));
    }

    #[test]
    fn dispatches_on_endpoint() {
        let payload = json!({"c": "12.5"});
        assert_eq!(
            decode_payload(Endpoint::Quote, "AAPL", &payload).unwrap(),
            "12.50"
        );
    }
}

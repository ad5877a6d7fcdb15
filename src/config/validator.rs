use crate::error::{AppError, Result};

use super::BenchConfig;

/// Validate a run configuration and surface every problem in one error.
pub fn validate_config(config: &BenchConfig) -> Result<()> {
    let mut issues = Vec::new();

    validate_pool(config, &mut issues);
    validate_symbols(&config.symbols, &mut issues);
    validate_vendor(config, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "bench config for `{}` invalid:\n  - {}",
            config.endpoint,
            issues.join("\n  - ")
        )))
    }
}

fn validate_pool(config: &BenchConfig, issues: &mut Vec<String>) {
    if config.worker_count == 0 {
        issues.push("worker_count must be at least 1".to_string());
    }
    if config.queue_capacity == 0 {
        issues.push("queue_capacity must be at least 1".to_string());
    }
    if config.report_every == 0 {
        issues.push("report_every must be at least 1".to_string());
    }
    if config.request_timeout.is_zero() {
        issues.push("timeout_secs must be greater than zero".to_string());
    }
}

fn validate_symbols(symbols: &[String], issues: &mut Vec<String>) {
    if symbols.is_empty() {
        issues.push("symbols must contain at least one entry".to_string());
        return;
    }

    let blank = symbols.iter().filter(|s| s.trim().is_empty()).count();
    if blank > 0 {
        issues.push(format!("symbols contains {blank} blank value(s)"));
    }
}

fn validate_vendor(config: &BenchConfig, issues: &mut Vec<String>) {
    let url = config.base_url.trim();
    if url.is_empty() {
        issues.push("base_url must not be empty".to_string());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        issues.push(format!("base_url `{url}` must start with http:// or https://"));
    }
}

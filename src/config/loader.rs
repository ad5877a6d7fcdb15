use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::{Context, Result};

use super::{Endpoint, FailurePolicy};

/// Optional settings layered over the built-in defaults, from a JSON file or the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub endpoint: Option<Endpoint>,
    #[serde(default, alias = "workers")]
    pub worker_count: Option<usize>,
    #[serde(default, alias = "count")]
    pub item_count: Option<u64>,
    #[serde(default)]
    pub symbols: Option<Vec<String>>,
    #[serde(default)]
    pub report_every: Option<u64>,
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    #[serde(default)]
    pub failure_policy: Option<FailurePolicy>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Read a JSON run configuration. Every field is optional.
pub fn load_config_file(path: &Path) -> Result<ConfigOverrides> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read bench config JSON at {}", path.display()))?;

    let overrides: ConfigOverrides = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse bench config JSON at {}", path.display()))?;

    if let Some(symbols) = &overrides.symbols {
        log::debug!(
            "config {} lists {} symbol(s)",
            path.display(),
            symbols.len()
        );
    }

    Ok(overrides)
}

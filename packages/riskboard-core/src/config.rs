//! Configuration file handling.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Engine and CLI settings, read from TOML.
///
/// ```toml
/// base_currency = "USD"
/// default_benchmark = "^GSPC"
/// default_risk_free_rate_pct = 4.2
/// default_lookback_years = 5
/// data_dir = "/srv/market-data"
/// cache_file = "/tmp/riskboard-cache.json"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Currency every price is normalized into
    pub base_currency: String,
    /// Benchmark used when none is given
    pub default_benchmark: String,
    /// Annual risk-free rate in percent used when none is given
    pub default_risk_free_rate_pct: f64,
    /// Length of the default analysis window, ending today
    pub default_lookback_years: u32,
    /// Directory read by the JSON file provider
    pub data_dir: PathBuf,
    /// Cache snapshot location (defaults to `~/.riskboard/cache.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
            default_benchmark: "^GSPC".to_string(),
            default_risk_free_rate_pct: 3.5,
            default_lookback_years: 5,
            data_dir: PathBuf::from("data"),
            cache_file: None,
        }
    }
}

impl Config {
    /// Get the default config file path.
    ///
    /// Default path: `~/.riskboard/config.toml`
    /// Can be overridden with `RISKBOARD_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("RISKBOARD_CONFIG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".riskboard/config.toml"))
            .unwrap_or_else(|| PathBuf::from("riskboard.toml"))
    }

    /// Load the config at the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load a config file; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.base_currency = config.base_currency.to_uppercase();
        Ok(config)
    }
}

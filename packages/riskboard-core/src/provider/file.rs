//! Market data provider backed by JSON files on disk.
//!
//! Layout of the data directory:
//!
//! ```text
//! <dir>/AAPL.json   {"currency": "USD", "current_price": 189.5, "market_cap": 2.9e12,
//!                    "average_volume": 5.4e7, "pe_ratio": 29.1,
//!                    "history": [{"date": "2024-01-02", "close": 185.6}, ...]}
//! <dir>/fx.json     {"EUR/USD": 1.09, "GBP/USD": 1.27}
//! ```

use super::{ExchangeRateSource, MetadataSource, PriceHistorySource};
use crate::types::{AssetMetadata, DateRange, PriceHistory};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const FX_FILE: &str = "fx.json";

/// Provider reading per-symbol JSON files from a directory.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct SymbolFile {
    #[serde(flatten)]
    metadata: AssetMetadata,
    #[serde(default)]
    history: Vec<Bar>,
}

#[derive(Debug, Deserialize)]
struct Bar {
    date: NaiveDate,
    close: f64,
}

impl JsonFileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, file_name: &str, what: &str) -> Result<String> {
        let path = self.dir.join(file_name);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::DataUnavailable(format!("Unknown {}", what)),
            _ => Error::DataUnavailable(format!("Cannot read {}: {}", path.display(), e)),
        })
    }

    fn load_symbol(&self, asset_id: &str) -> Result<SymbolFile> {
        if asset_id.is_empty()
            || asset_id.contains(['/', '\\'])
            || asset_id.contains("..")
        {
            return Err(Error::DataUnavailable(format!(
                "Invalid symbol: {:?}",
                asset_id
            )));
        }

        let content = self.read(
            &format!("{}.json", asset_id),
            &format!("symbol: {}", asset_id),
        )?;
        serde_json::from_str(&content)
            .map_err(|e| Error::DataUnavailable(format!("Malformed data for {}: {}", asset_id, e)))
    }
}

impl PriceHistorySource for JsonFileProvider {
    fn fetch_price_history(&self, asset_id: &str, range: DateRange) -> Result<PriceHistory> {
        tracing::info!(
            "Loading price history for {} ({} to {}) from {}",
            asset_id,
            range.start,
            range.end,
            self.dir.display()
        );

        let file = self.load_symbol(asset_id)?;
        let mut bars: Vec<Bar> = file
            .history
            .into_iter()
            .filter(|bar| range.contains(bar.date))
            .collect();
        bars.sort_by_key(|bar| bar.date);

        if bars.is_empty() {
            return Err(Error::DataUnavailable(format!(
                "No price history for {} between {} and {}",
                asset_id, range.start, range.end
            )));
        }

        Ok(PriceHistory {
            dates: bars.iter().map(|bar| bar.date).collect(),
            prices: bars.iter().map(|bar| bar.close).collect(),
            currency: file.metadata.currency,
        })
    }
}

impl ExchangeRateSource for JsonFileProvider {
    fn fetch_exchange_rate(&self, from: &str, to: &str) -> Result<Option<f64>> {
        tracing::info!("Loading exchange rate {} -> {}", from, to);

        let content = self.read(FX_FILE, "exchange rate table")?;
        let table: HashMap<String, f64> = serde_json::from_str(&content)
            .map_err(|e| Error::DataUnavailable(format!("Malformed {}: {}", FX_FILE, e)))?;

        if let Some(rate) = table.get(&format!("{}/{}", from, to)) {
            return Ok(Some(*rate));
        }

        // Fall back to the inverse quote
        Ok(table
            .get(&format!("{}/{}", to, from))
            .filter(|rate| **rate != 0.0)
            .map(|rate| 1.0 / rate))
    }
}

impl MetadataSource for JsonFileProvider {
    fn fetch_asset_metadata(&self, asset_id: &str) -> Result<AssetMetadata> {
        tracing::info!("Loading metadata for {}", asset_id);
        Ok(self.load_symbol(asset_id)?.metadata)
    }
}

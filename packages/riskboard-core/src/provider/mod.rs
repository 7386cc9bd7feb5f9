//! Market data collaborators.
//!
//! The engine never talks to a network provider directly. Price history,
//! exchange rates and asset metadata are requested through these traits;
//! implementations report unknown symbols and provider failures as
//! [`Error::DataUnavailable`](crate::Error::DataUnavailable).

mod file;

pub use file::JsonFileProvider;

use crate::types::{AssetMetadata, DateRange, PriceHistory};
use crate::Result;

/// Source of daily close-price history.
pub trait PriceHistorySource {
    /// Fetch close prices of `asset_id` for every trading day in `range`.
    fn fetch_price_history(&self, asset_id: &str, range: DateRange) -> Result<PriceHistory>;
}

/// Source of spot exchange rates.
pub trait ExchangeRateSource {
    /// Fetch the rate converting one unit of `from` into `to`.
    ///
    /// `Ok(None)` means the provider answered but had no quote for the pair.
    fn fetch_exchange_rate(&self, from: &str, to: &str) -> Result<Option<f64>>;
}

/// Source of descriptive asset data (price, market cap, ...).
pub trait MetadataSource {
    fn fetch_asset_metadata(&self, asset_id: &str) -> Result<AssetMetadata>;
}

impl<T: PriceHistorySource + ?Sized> PriceHistorySource for &T {
    fn fetch_price_history(&self, asset_id: &str, range: DateRange) -> Result<PriceHistory> {
        (**self).fetch_price_history(asset_id, range)
    }
}

impl<T: ExchangeRateSource + ?Sized> ExchangeRateSource for &T {
    fn fetch_exchange_rate(&self, from: &str, to: &str) -> Result<Option<f64>> {
        (**self).fetch_exchange_rate(from, to)
    }
}

impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    fn fetch_asset_metadata(&self, asset_id: &str) -> Result<AssetMetadata> {
        (**self).fetch_asset_metadata(asset_id)
    }
}

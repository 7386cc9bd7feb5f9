//! Caller-owned caches carried between analytics calls.
//!
//! Provides the range-exact price cache, the sticky exchange-rate cache and a
//! JSON snapshot store for reusing both across processes.

mod price;
mod rates;
mod store;

pub use price::PriceCache;
pub use rates::ExchangeRateCache;
pub use store::CacheStore;

use serde::{Deserialize, Serialize};

/// All state an analytics session keeps between calls.
///
/// The benchmark has its own single-entry cache so that switching benchmarks
/// never evicts portfolio assets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Caches {
    /// Portfolio asset histories
    pub prices: PriceCache,
    /// Benchmark history
    pub benchmark: PriceCache,
    /// Exchange rates into the base currency
    pub rates: ExchangeRateCache,
}

impl Caches {
    /// Create empty caches normalizing into `base_currency`.
    pub fn new(base_currency: &str) -> Self {
        Self {
            prices: PriceCache::new(),
            benchmark: PriceCache::new(),
            rates: ExchangeRateCache::new(base_currency),
        }
    }
}

impl Default for Caches {
    fn default() -> Self {
        Self::new("USD")
    }
}

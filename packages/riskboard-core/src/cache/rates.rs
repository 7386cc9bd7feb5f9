//! Sticky exchange-rate cache.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Conversion rates into a single base currency, keyed by source currency.
///
/// Entries are never overwritten or expired for the lifetime of the cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRateCache {
    base: String,
    rates: BTreeMap<String, f64>,
}

impl ExchangeRateCache {
    /// Create an empty cache converting into `base`.
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_uppercase(),
            rates: BTreeMap::new(),
        }
    }

    /// Get the base currency.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve the rate from `currency` into the base currency.
    ///
    /// The base currency itself resolves to 1.0 without a lookup. On a miss
    /// `fetch(currency, base)` is called and a returned rate is stored for
    /// good. A fetch that succeeds without a rate resolves to 1.0, which is
    /// not stored.
    pub fn get_or_fetch<F>(&mut self, currency: &str, fetch: F) -> Result<f64>
    where
        F: FnOnce(&str, &str) -> Result<Option<f64>>,
    {
        if currency.eq_ignore_ascii_case(&self.base) {
            return Ok(1.0);
        }
        if let Some(rate) = self.rates.get(currency) {
            tracing::debug!("Exchange rate cache hit for {}", currency);
            return Ok(*rate);
        }

        match fetch(currency, &self.base)? {
            Some(rate) if rate.is_finite() && rate > 0.0 => {
                tracing::debug!("Caching exchange rate {} -> {} = {}", currency, self.base, rate);
                self.rates.insert(currency.to_string(), rate);
                Ok(rate)
            }
            Some(rate) => Err(Error::DataUnavailable(format!(
                "Invalid exchange rate {} -> {}: {}",
                currency, self.base, rate
            ))),
            None => {
                tracing::warn!(
                    "No exchange rate for {} -> {}, assuming 1.0",
                    currency,
                    self.base
                );
                Ok(1.0)
            }
        }
    }

    /// Get a cached rate.
    pub fn get(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    /// Iterate over cached `(currency, rate)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(c, r)| (c.as_str(), *r))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

//! Range-exact price history cache.

use crate::types::{DateRange, PriceHistory, PriceSeries};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Most recently fetched price series per asset.
///
/// An entry only satisfies a request for the exact range it was fetched for;
/// a subset or superset range is a miss and triggers a full refetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PriceCache {
    entries: BTreeMap<String, PriceSeries>,
}

impl PriceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached series for `asset_id` and `range`, fetching it on a miss.
    ///
    /// On a miss `fetch` is called exactly once and its result replaces any
    /// previous entry. If the fetch (or validation of its payload) fails the
    /// cache is left as it was.
    pub fn get_or_fetch<F>(&mut self, asset_id: &str, range: DateRange, fetch: F) -> Result<&PriceSeries>
    where
        F: FnOnce(&str, DateRange) -> Result<PriceHistory>,
    {
        let hit = self
            .entries
            .get(asset_id)
            .is_some_and(|series| series.range() == range);

        if hit {
            tracing::debug!("Price cache hit for {}", asset_id);
        } else {
            tracing::debug!(
                "Price cache miss for {} ({} to {})",
                asset_id,
                range.start,
                range.end
            );
            let series = PriceSeries::new(asset_id, fetch(asset_id, range)?, range)?;
            self.entries.insert(asset_id.to_string(), series);
        }

        Ok(&self.entries[asset_id])
    }

    /// Get a cached series regardless of its range.
    pub fn get(&self, asset_id: &str) -> Option<&PriceSeries> {
        self.entries.get(asset_id)
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.entries.contains_key(asset_id)
    }

    /// Drop every entry whose asset is not in `keep`.
    pub fn retain<S: AsRef<str>>(&mut self, keep: &[S]) {
        self.entries
            .retain(|id, _| keep.iter().any(|k| k.as_ref() == id.as_str()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over cached asset ids.
    pub fn asset_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

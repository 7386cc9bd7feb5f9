//! JSON snapshot of the session caches.

use super::Caches;
use crate::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Cache holder that can persist its contents to a JSON file.
#[derive(Debug)]
pub struct CacheStore {
    /// Path to the snapshot file (empty for in-memory stores)
    path: PathBuf,
    /// In-memory caches
    caches: Caches,
}

impl CacheStore {
    /// Open the snapshot at `path`, starting empty if it does not exist yet.
    ///
    /// A snapshot for a different base currency is discarded, since its
    /// exchange rates and converted values no longer apply.
    pub fn with_path(path: PathBuf, base_currency: &str) -> Result<Self> {
        let caches = match Self::load_from_path(&path)? {
            Some(caches) if caches.rates.base().eq_ignore_ascii_case(base_currency) => caches,
            Some(_) => {
                tracing::info!(
                    "Discarding cache snapshot {} (base currency changed to {})",
                    path.display(),
                    base_currency
                );
                Caches::new(base_currency)
            }
            None => Caches::new(base_currency),
        };
        Ok(Self { path, caches })
    }

    /// Create an in-memory store (no persistence).
    pub fn in_memory(base_currency: &str) -> Self {
        Self {
            path: PathBuf::new(),
            caches: Caches::new(base_currency),
        }
    }

    /// Get the default snapshot path.
    ///
    /// Default path: `~/.riskboard/cache.json`
    /// Can be overridden with `RISKBOARD_CACHE_FILE` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("RISKBOARD_CACHE_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".riskboard/cache.json"))
            .unwrap_or_else(|| PathBuf::from("riskboard-cache.json"))
    }

    /// Get the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_path(path: &Path) -> Result<Option<Caches>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write the caches to disk.
    pub fn save(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.caches)?;
        fs::write(&self.path, content)?;
        tracing::debug!("Saved cache snapshot to {}", self.path.display());
        Ok(())
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    pub fn caches_mut(&mut self) -> &mut Caches {
        &mut self.caches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DateRange, PriceHistory};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn fill(caches: &mut Caches) {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        caches
            .prices
            .get_or_fetch("SAP.DE", range, |_, _| {
                Ok(PriceHistory {
                    dates: vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()],
                    prices: vec![150.0],
                    currency: "EUR".to_string(),
                })
            })
            .unwrap();
        caches.rates.get_or_fetch("EUR", |_, _| Ok(Some(1.1))).unwrap();
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let mut store = CacheStore::in_memory("USD");
        fill(store.caches_mut());
        store.save().unwrap();
        assert!(store.path().as_os_str().is_empty());
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/cache.json");

        {
            let mut store = CacheStore::with_path(path.clone(), "USD").unwrap();
            fill(store.caches_mut());
            store.save().unwrap();
        }

        {
            let store = CacheStore::with_path(path, "USD").unwrap();
            assert_eq!(store.caches().prices.len(), 1);
            assert_eq!(store.caches().prices.get("SAP.DE").unwrap().currency(), "EUR");
            assert_eq!(store.caches().rates.get("EUR"), Some(1.1));
        }
    }

    #[test]
    fn test_base_currency_change_discards_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut store = CacheStore::with_path(path.clone(), "USD").unwrap();
        fill(store.caches_mut());
        store.save().unwrap();

        let store = CacheStore::with_path(path, "EUR").unwrap();
        assert!(store.caches().prices.is_empty());
        assert!(store.caches().rates.is_empty());
        assert_eq!(store.caches().rates.base(), "EUR");
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{not json").unwrap();

        assert!(CacheStore::with_path(path, "USD").is_err());
    }
}

//! Riskboard Core - Portfolio analytics engine.
//!
//! This crate computes portfolio-level risk/return metrics from daily closing
//! prices of a basket of assets and a benchmark index:
//!
//! - **Price caching**: range-exact per-asset history cache
//! - **FX normalization**: sticky exchange-rate cache, conversion into a base currency
//! - **Alignment**: strict inner join of unevenly dated series
//! - **Metrics**: cumulative and dollar return, Sharpe, Sortino, alpha, beta
//!
//! Market data is reached only through the collaborator traits in [`provider`].
//!
//! # Example
//!
//! ```rust,no_run
//! use riskboard_core::{Analyzer, Caches, DateRange, JsonFileProvider};
//! use chrono::NaiveDate;
//!
//! let provider = JsonFileProvider::new("data");
//! let analyzer = Analyzer::new(provider);
//! let mut caches = Caches::new("USD");
//!
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
//! )
//! .unwrap();
//!
//! let metrics = analyzer
//!     .compute_portfolio_metrics("AAPL, 10\nSAP.DE, 5", range, "^GSPC", "4.2", &mut caches)
//!     .unwrap();
//! println!("Sharpe: {:.2}", metrics.sharpe_ratio);
//! ```

pub mod align;
pub mod analytics;
pub mod cache;
pub mod config;
pub mod engine;
pub mod format;
pub mod normalize;
pub mod portfolio;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, AssetMetadata, DateRange, MetricsResult, PortfolioPosition, PriceHistory,
    PriceSeries, StockSummary,
};

// Re-export main functionality
pub use align::{align, align_assets, AlignedColumn, AlignedDataset};
pub use cache::{CacheStore, Caches, ExchangeRateCache, PriceCache};
pub use config::Config;
pub use engine::Analyzer;
pub use format::{format_number, MetricsDisplay, StockSummaryDisplay};
pub use normalize::{normalize, NormalizedSet};
pub use portfolio::{merge_duplicates, parse_portfolio_text, sanitize_shares, SharesInput};
pub use provider::{ExchangeRateSource, JsonFileProvider, MetadataSource, PriceHistorySource};

/// Error types for riskboard-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Category of an [`Error`], as reported at the orchestration boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    DataUnavailable,
    Internal,
}

impl Error {
    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::DataUnavailable(_) => ErrorKind::DataUnavailable,
            Error::Io(_) | Error::Json(_) | Error::Config(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for riskboard-core operations.
pub type Result<T> = std::result::Result<T, Error>;

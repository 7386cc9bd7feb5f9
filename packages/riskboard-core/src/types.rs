//! Core data types for the analytics engine.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar date range a price history is requested for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting an end date before the start date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidInput(format!(
                "End date {} is before start date {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Check whether a date falls inside the range (both ends included).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Raw price history as returned by a price-history collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    /// Trading dates
    pub dates: Vec<NaiveDate>,
    /// Close price for each date
    pub prices: Vec<f64>,
    /// Native currency code of the prices
    pub currency: String,
}

/// A validated, immutable close-price series for one asset.
///
/// Dates are strictly increasing and every price is finite and positive.
/// Currency conversion produces a new series via [`PriceSeries::converted`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "SeriesRecord")]
pub struct PriceSeries {
    asset_id: String,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
    currency: String,
    range: DateRange,
}

/// Unvalidated serialized form of a [`PriceSeries`].
#[derive(Deserialize)]
struct SeriesRecord {
    asset_id: String,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
    currency: String,
    range: DateRange,
}

impl TryFrom<SeriesRecord> for PriceSeries {
    type Error = Error;

    fn try_from(record: SeriesRecord) -> Result<Self> {
        PriceSeries::new(
            &record.asset_id,
            PriceHistory {
                dates: record.dates,
                prices: record.prices,
                currency: record.currency,
            },
            record.range,
        )
    }
}

impl PriceSeries {
    /// Validate a fetched history and tag it with the range it was requested for.
    pub fn new(asset_id: &str, history: PriceHistory, range: DateRange) -> Result<Self> {
        let PriceHistory {
            dates,
            prices,
            currency,
        } = history;

        if dates.len() != prices.len() {
            return Err(Error::DataUnavailable(format!(
                "{}: {} dates but {} prices",
                asset_id,
                dates.len(),
                prices.len()
            )));
        }
        if dates.is_empty() {
            return Err(Error::DataUnavailable(format!(
                "{}: no prices between {} and {}",
                asset_id, range.start, range.end
            )));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::DataUnavailable(format!(
                "{}: dates are not strictly increasing",
                asset_id
            )));
        }
        if let Some(bad) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
            return Err(Error::DataUnavailable(format!(
                "{}: invalid close price {}",
                asset_id, bad
            )));
        }

        Ok(Self {
            asset_id: asset_id.to_string(),
            dates,
            prices,
            currency,
            range,
        })
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// The range this series was fetched for.
    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Number of observations (never zero).
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Close price on the first date of the series.
    pub fn first_price(&self) -> f64 {
        self.prices[0]
    }

    /// Close price on a given date, if the series has one.
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.prices[idx])
    }

    /// Produce a copy with every price multiplied by `rate`, labelled with `currency`.
    pub fn converted(&self, rate: f64, currency: &str) -> Self {
        Self {
            asset_id: self.asset_id.clone(),
            dates: self.dates.clone(),
            prices: self.prices.iter().map(|p| p * rate).collect(),
            currency: currency.to_string(),
            range: self.range,
        }
    }
}

/// One holding of the analysed portfolio, valued in the base currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioPosition {
    /// Asset identifier (ticker)
    pub asset_id: String,
    /// Sanitized share count
    pub shares: i64,
    /// Native currency of the asset
    pub currency: String,
    /// Base-currency value at the first date of the fetched range
    pub start_value: f64,
}

impl PortfolioPosition {
    /// Value a position from its base-currency price series.
    pub fn new(shares: i64, native_currency: &str, series: &PriceSeries) -> Self {
        Self {
            asset_id: series.asset_id().to_string(),
            shares,
            currency: native_currency.to_string(),
            start_value: shares as f64 * series.first_price(),
        }
    }
}

/// Portfolio risk/return metrics.
///
/// Ratios, alpha and beta are `NaN` when they cannot be computed (zero
/// variance, no downside observations); serialized as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResult {
    /// Currency of `dollar_return` and the position values
    pub base_currency: String,
    /// Annualized Jensen's alpha against the benchmark
    pub alpha: f64,
    /// Weighted average of the individual asset betas
    pub beta: f64,
    /// Weighted cumulative return in percent
    pub cumulative_return_pct: f64,
    /// Absolute return in the base currency
    pub dollar_return: f64,
    /// Annualized Sharpe ratio
    pub sharpe_ratio: f64,
    /// Annualized Sortino ratio
    pub sortino_ratio: f64,
    /// Number of dates shared by every asset and the benchmark
    pub aligned_observations: usize,
    /// Positions used for weighting
    pub positions: Vec<PortfolioPosition>,
}

/// Descriptive data for a single asset, used for display only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetMetadata {
    /// Native currency code
    pub currency: String,
    /// Latest quoted price
    pub current_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_volume: Option<f64>,
    /// Trailing price/earnings ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
}

/// Quote summary and close-price history of a single asset.
#[derive(Debug, Clone, Serialize)]
pub struct StockSummary {
    pub asset_id: String,
    pub metadata: AssetMetadata,
    pub series: PriceSeries,
}

/// API response wrapper used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Create an error response that still carries a payload (e.g. placeholders).
    pub fn err_with(error: impl Into<String>, data: T) -> Self {
        Self {
            ok: false,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}

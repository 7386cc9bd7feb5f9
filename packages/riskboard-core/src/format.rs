//! Display formatting for metrics and quote summaries.

use crate::types::{MetricsResult, StockSummary};
use serde::Serialize;

const SUFFIXES: [&str; 6] = ["", "K", "M", "B", "T", "Q"];

/// Placeholder shown for every field when no data is available.
pub const NO_DATA: &str = "-";

/// Compact a number with a magnitude suffix: `1234567.0` -> `"1.23M"`.
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return format!("{}", num);
    }

    let mut value = num;
    let mut magnitude = 0;
    while value.abs() >= 1000.0 && magnitude < SUFFIXES.len() - 1 {
        magnitude += 1;
        value /= 1000.0;
    }
    format!("{:.2}{}", value, SUFFIXES[magnitude])
}

/// Portfolio metrics rendered for display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsDisplay {
    pub alpha: String,
    pub beta: String,
    pub cumulative_return: String,
    pub dollar_return: String,
    pub sharpe_ratio: String,
    pub sortino_ratio: String,
}

impl MetricsDisplay {
    /// Every field set to the no-data placeholder.
    pub fn placeholder() -> Self {
        Self {
            alpha: NO_DATA.to_string(),
            beta: NO_DATA.to_string(),
            cumulative_return: NO_DATA.to_string(),
            dollar_return: NO_DATA.to_string(),
            sharpe_ratio: NO_DATA.to_string(),
            sortino_ratio: NO_DATA.to_string(),
        }
    }
}

impl From<&MetricsResult> for MetricsDisplay {
    fn from(result: &MetricsResult) -> Self {
        Self {
            alpha: format!("{:.2}", result.alpha),
            beta: format!("{:.2}", result.beta),
            cumulative_return: format!("{:.2} %", result.cumulative_return_pct),
            dollar_return: format!(
                "{} {}",
                format_number(result.dollar_return),
                result.base_currency
            ),
            sharpe_ratio: format!("{:.2}", result.sharpe_ratio),
            sortino_ratio: format!("{:.2}", result.sortino_ratio),
        }
    }
}

/// Quote summary rendered for display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StockSummaryDisplay {
    pub current_price: String,
    pub market_cap: String,
    pub average_volume: String,
    pub pe_ratio: String,
}

impl StockSummaryDisplay {
    pub fn placeholder() -> Self {
        Self {
            current_price: NO_DATA.to_string(),
            market_cap: NO_DATA.to_string(),
            average_volume: NO_DATA.to_string(),
            pe_ratio: NO_DATA.to_string(),
        }
    }
}

impl From<&StockSummary> for StockSummaryDisplay {
    fn from(summary: &StockSummary) -> Self {
        let meta = &summary.metadata;
        Self {
            current_price: format!("{:.2} {}", meta.current_price, meta.currency),
            market_cap: meta
                .market_cap
                .map(format_number)
                .unwrap_or_else(|| NO_DATA.to_string()),
            average_volume: meta
                .average_volume
                .map(format_number)
                .unwrap_or_else(|| NO_DATA.to_string()),
            pe_ratio: meta
                .pe_ratio
                .map(|pe| format!("{:.2}", pe))
                .unwrap_or_else(|| "NaN".to_string()),
        }
    }
}

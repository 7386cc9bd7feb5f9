//! Calendar alignment of price series.
//!
//! Performs a strict inner join on date: a row survives only if every input
//! series has a price on that date. No interpolation, no forward fill.

use crate::types::PriceSeries;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// One price column of an [`AlignedDataset`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlignedColumn {
    pub asset_id: String,
    pub prices: Vec<f64>,
}

/// Prices of several series on their common dates.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlignedDataset {
    /// Shared ascending date index
    pub dates: Vec<NaiveDate>,
    /// Asset columns, in input order
    pub assets: Vec<AlignedColumn>,
    /// Benchmark column, when aligned against one
    pub benchmark: Option<AlignedColumn>,
}

impl AlignedDataset {
    /// Number of aligned rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Align asset series and a benchmark on their common dates.
pub fn align(assets: &[PriceSeries], benchmark: &PriceSeries) -> AlignedDataset {
    let all: Vec<&PriceSeries> = assets.iter().chain(std::iter::once(benchmark)).collect();
    let dates = common_dates(&all);

    AlignedDataset {
        assets: assets.iter().map(|s| column(s, &dates)).collect(),
        benchmark: Some(column(benchmark, &dates)),
        dates,
    }
}

/// Align asset series on their common dates, without a benchmark.
pub fn align_assets(assets: &[PriceSeries]) -> AlignedDataset {
    let all: Vec<&PriceSeries> = assets.iter().collect();
    let dates = common_dates(&all);

    AlignedDataset {
        assets: assets.iter().map(|s| column(s, &dates)).collect(),
        benchmark: None,
        dates,
    }
}

fn common_dates(series: &[&PriceSeries]) -> Vec<NaiveDate> {
    let Some((first, rest)) = series.split_first() else {
        return Vec::new();
    };

    let mut common: BTreeSet<NaiveDate> = first.dates().iter().copied().collect();
    for s in rest {
        let dates: BTreeSet<NaiveDate> = s.dates().iter().copied().collect();
        common = common.intersection(&dates).copied().collect();
    }

    let longest = series.iter().map(|s| s.len()).max().unwrap_or(0);
    if common.len() < longest {
        tracing::debug!(
            "Alignment kept {} of up to {} dates across {} series",
            common.len(),
            longest,
            series.len()
        );
    }
    if common.is_empty() {
        tracing::warn!("Series share no common dates");
    }

    common.into_iter().collect()
}

fn column(series: &PriceSeries, dates: &[NaiveDate]) -> AlignedColumn {
    AlignedColumn {
        asset_id: series.asset_id().to_string(),
        prices: dates
            .iter()
            .filter_map(|date| series.price_on(*date))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DateRange, PriceHistory};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn series(id: &str, days: &[u32]) -> PriceSeries {
        PriceSeries::new(
            id,
            PriceHistory {
                dates: days.iter().map(|day| d(*day)).collect(),
                prices: days.iter().map(|day| 100.0 + *day as f64).collect(),
                currency: "USD".to_string(),
            },
            DateRange::new(d(1), d(30)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_inner_join() {
        let assets = vec![series("AAA", &[1, 2, 3, 5, 8]), series("BBB", &[2, 3, 4, 5, 8])];
        let benchmark = series("^IDX", &[1, 2, 5, 8, 9]);

        let aligned = align(&assets, &benchmark);

        assert_eq!(aligned.dates, vec![d(2), d(5), d(8)]);
        assert_eq!(aligned.assets[0].prices, vec![102.0, 105.0, 108.0]);
        assert_eq!(aligned.assets[1].asset_id, "BBB");
        assert_eq!(aligned.assets[1].prices.len(), 3);

        let bench = aligned.benchmark.unwrap();
        assert_eq!(bench.asset_id, "^IDX");
        assert_eq!(bench.prices, vec![102.0, 105.0, 108.0]);
    }

    #[test]
    fn test_assets_only_ignores_benchmark_gaps() {
        let assets = vec![series("AAA", &[1, 2, 3, 4]), series("BBB", &[1, 2, 3, 4])];
        let benchmark = series("^IDX", &[1, 4]);

        assert_eq!(align(&assets, &benchmark).len(), 2);

        let own = align_assets(&assets);
        assert_eq!(own.len(), 4);
        assert!(own.benchmark.is_none());
    }

    #[test]
    fn test_no_overlap_is_empty() {
        let assets = vec![series("AAA", &[1, 2, 3])];
        let benchmark = series("^IDX", &[10, 11, 12]);

        let aligned = align(&assets, &benchmark);

        assert!(aligned.is_empty());
        assert!(aligned.assets[0].prices.is_empty());
        assert!(aligned.benchmark.unwrap().prices.is_empty());
    }

    #[test]
    fn test_every_column_matches_index() {
        let assets = vec![
            series("AAA", &[1, 3, 5, 7, 9, 11]),
            series("BBB", &[1, 2, 3, 5, 7, 11, 12]),
            series("CCC", &[3, 5, 6, 7, 11]),
        ];
        let benchmark = series("^IDX", &[1, 3, 5, 7, 11, 13]);

        let aligned = align(&assets, &benchmark);

        assert_eq!(aligned.dates, vec![d(3), d(5), d(7), d(11)]);
        assert!(aligned.dates.windows(2).all(|w| w[0] < w[1]));
        for col in &aligned.assets {
            assert_eq!(col.prices.len(), aligned.len());
        }
    }

    #[test]
    fn test_empty_input() {
        let aligned = align_assets(&[]);
        assert!(aligned.is_empty());
        assert!(aligned.assets.is_empty());
    }
}

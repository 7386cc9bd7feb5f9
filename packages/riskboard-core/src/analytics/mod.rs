//! Portfolio metrics engine.
//!
//! Computes weighted risk/return statistics from base-currency price data.
//! Returns and Sharpe/Sortino use the assets' own calendar, while alpha and
//! beta use the calendar shared with the benchmark.

mod performance;
mod risk;

pub use performance::{
    annualize_daily_mean, compound_return, cumulative_return_pct, dollar_return,
    portfolio_returns, simple_returns, weights,
};
pub use risk::{
    asset_beta, downside_deviation, jensens_alpha, mean, population_variance, portfolio_beta,
    sample_covariance, sample_std, sample_variance, sharpe_ratio, sortino_ratio,
};

use crate::align::{AlignedColumn, AlignedDataset};
use crate::types::{MetricsResult, PortfolioPosition, PriceSeries};
use crate::{Error, Result};

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Denominators smaller than this make a ratio undefined.
pub const NEAR_ZERO: f64 = 1e-12;

/// Everything the metrics engine needs, all in the base currency.
#[derive(Debug, Clone, Copy)]
pub struct MetricsInput<'a> {
    /// Positions, in the same order as `series`
    pub positions: &'a [PortfolioPosition],
    /// Full price series of each asset
    pub series: &'a [PriceSeries],
    /// Assets aligned among themselves
    pub assets_aligned: &'a AlignedDataset,
    /// Assets aligned with the benchmark
    pub benchmark_aligned: &'a AlignedDataset,
    /// Annual risk-free rate as a decimal
    pub risk_free_rate: f64,
    pub base_currency: &'a str,
}

/// Compute all portfolio metrics.
///
/// Fails with `DataUnavailable` when the assets and the benchmark share fewer
/// than two dates, since no benchmark return can be formed.
pub fn compute_metrics(input: MetricsInput<'_>) -> Result<MetricsResult> {
    let MetricsInput {
        positions,
        series,
        assets_aligned,
        benchmark_aligned,
        risk_free_rate,
        base_currency,
    } = input;

    let benchmark = benchmark_aligned
        .benchmark
        .as_ref()
        .filter(|_| benchmark_aligned.len() >= 2)
        .ok_or_else(|| {
            Error::DataUnavailable(format!(
                "Portfolio and benchmark share {} trading day(s), need at least 2",
                benchmark_aligned.len()
            ))
        })?;

    let start_values: Vec<f64> = positions.iter().map(|p| p.start_value).collect();
    let w = weights(&start_values)?;

    // Each asset over its full history
    let own_returns: Vec<Vec<f64>> = series.iter().map(|s| simple_returns(s.prices())).collect();
    let cumulative_return_pct = cumulative_return_pct(&own_returns, &w);
    let dollar_return = dollar_return(&own_returns, &start_values);

    // Assets on their shared calendar
    let daily = portfolio_returns(&column_returns(&assets_aligned.assets), &w);
    let sharpe_ratio = sharpe_ratio(&daily, risk_free_rate);
    let sortino_ratio = sortino_ratio(&daily, risk_free_rate);

    // Assets and benchmark on their shared calendar
    let aligned_returns = column_returns(&benchmark_aligned.assets);
    let benchmark_returns = simple_returns(&benchmark.prices);
    let beta = portfolio_beta(&aligned_returns, &benchmark_returns, &w);
    let alpha = jensens_alpha(
        &portfolio_returns(&aligned_returns, &w),
        &benchmark_returns,
        risk_free_rate,
        beta,
    );

    tracing::debug!(
        "Computed metrics over {} aligned days ({} asset days)",
        benchmark_aligned.len(),
        assets_aligned.len()
    );

    Ok(MetricsResult {
        base_currency: base_currency.to_string(),
        alpha,
        beta,
        cumulative_return_pct,
        dollar_return,
        sharpe_ratio,
        sortino_ratio,
        aligned_observations: benchmark_aligned.len(),
        positions: positions.to_vec(),
    })
}

fn column_returns(columns: &[AlignedColumn]) -> Vec<Vec<f64>> {
    columns.iter().map(|c| simple_returns(&c.prices)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{align, align_assets};
    use crate::types::{DateRange, PriceHistory};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn series(id: &str, days: &[u32], prices: &[f64]) -> PriceSeries {
        PriceSeries::new(
            id,
            PriceHistory {
                dates: days.iter().map(|day| d(*day)).collect(),
                prices: prices.to_vec(),
                currency: "USD".to_string(),
            },
            DateRange::new(d(1), d(30)).unwrap(),
        )
        .unwrap()
    }

    fn run(assets: &[PriceSeries], shares: &[i64], benchmark: &PriceSeries, rf: f64) -> Result<MetricsResult> {
        let positions: Vec<PortfolioPosition> = assets
            .iter()
            .zip(shares)
            .map(|(s, n)| PortfolioPosition::new(*n, "USD", s))
            .collect();
        compute_metrics(MetricsInput {
            positions: &positions,
            series: assets,
            assets_aligned: &align_assets(assets),
            benchmark_aligned: &align(assets, benchmark),
            risk_free_rate: rf,
            base_currency: "USD",
        })
    }

    #[test]
    fn test_single_asset_growth() {
        let assets = vec![series("AAA", &[3, 4, 5], &[100.0, 110.0, 121.0])];
        let benchmark = series("^IDX", &[3, 4, 5], &[1000.0, 1010.0, 1030.0]);

        let result = run(&assets, &[10], &benchmark, 0.0).unwrap();

        assert_relative_eq!(result.cumulative_return_pct, 21.0, epsilon = 1e-9);
        assert_relative_eq!(result.dollar_return, 210.0, epsilon = 1e-9);
        assert_eq!(result.positions[0].start_value, 1000.0);
        assert_eq!(result.aligned_observations, 3);
        // Identical daily returns have no volatility
        assert!(result.sharpe_ratio.is_nan());
        assert!(result.sortino_ratio.is_nan());
    }

    #[test]
    fn test_opposite_returns_average_out() {
        let days = [3, 4, 5, 6];
        let assets = vec![
            series("AAA", &days, &[100.0, 105.0, 102.9, 103.929]),
            series("BBB", &days, &[100.0, 99.0, 99.99, 96.9903]),
        ];
        let benchmark = series("^IDX", &days, &[50.0, 50.5, 50.0, 50.6]);

        let result = run(&assets, &[1, 1], &benchmark, 0.01).unwrap();

        let daily = portfolio_returns(
            &[
                simple_returns(assets[0].prices()),
                simple_returns(assets[1].prices()),
            ],
            &[0.5, 0.5],
        );
        assert_relative_eq!(daily[0], 0.02, epsilon = 1e-9);
        assert_relative_eq!(daily[1], -0.005, epsilon = 1e-9);
        assert_relative_eq!(daily[2], -0.01, epsilon = 1e-9);

        assert!(sample_std(&daily) > 0.0);
        assert!(result.sharpe_ratio.is_finite());
        assert_relative_eq!(result.sharpe_ratio, sharpe_ratio(&daily, 0.01), epsilon = 1e-12);
        assert!(result.beta.is_finite());
        assert!(result.alpha.is_finite());
    }

    #[test]
    fn test_benchmark_gaps_do_not_truncate_returns() {
        let days = [3, 4, 5, 6, 7];
        let assets = vec![series("AAA", &days, &[10.0, 11.0, 10.5, 11.5, 12.0])];
        let benchmark = series("^IDX", &[3, 5, 7], &[100.0, 101.0, 99.0]);

        let result = run(&assets, &[1], &benchmark, 0.0).unwrap();

        assert_relative_eq!(result.cumulative_return_pct, 20.0, epsilon = 1e-9);
        assert_eq!(result.aligned_observations, 3);

        let own = simple_returns(assets[0].prices());
        assert_relative_eq!(result.sharpe_ratio, sharpe_ratio(&own, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_no_overlap_with_benchmark() {
        let assets = vec![series("AAA", &[3, 4, 5], &[10.0, 11.0, 12.0])];
        let benchmark = series("^IDX", &[10, 11, 12], &[100.0, 101.0, 102.0]);

        let result = run(&assets, &[1], &benchmark, 0.0);
        assert!(matches!(result, Err(Error::DataUnavailable(_))));
    }

    #[test]
    fn test_beta_uses_benchmark_calendar() {
        let days = [3, 4, 5, 6, 7];
        let market = [100.0, 102.0, 99.96, 101.9592, 100.939608];
        // AAA moves exactly twice the market each day
        let mut aaa = vec![50.0];
        for w in market.windows(2) {
            let r = w[1] / w[0] - 1.0;
            let last = *aaa.last().unwrap();
            aaa.push(last * (1.0 + 2.0 * r));
        }
        let assets = vec![series("AAA", &days, &aaa)];
        let benchmark = series("^IDX", &days, &market);

        let result = run(&assets, &[2], &benchmark, 0.0).unwrap();
        // Four returns: 2 * 4 / 3
        assert_relative_eq!(result.beta, 8.0 / 3.0, epsilon = 1e-9);
    }
}

//! Portfolio return analytics.

use super::TRADING_DAYS;
use crate::{Error, Result};

/// Simple day-over-day returns: `p[t] / p[t-1] - 1`.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Weight of each position: its start value over the total investment.
///
/// Fails if the total investment is not positive, since weights are then
/// meaningless.
pub fn weights(start_values: &[f64]) -> Result<Vec<f64>> {
    let total: f64 = start_values.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(Error::InvalidInput(format!(
            "Total investment must be positive, got {}",
            total
        )));
    }

    Ok(start_values.iter().map(|v| v / total).collect())
}

/// Compounded return of a return series: `prod(1 + r) - 1`.
pub fn compound_return(returns: &[f64]) -> f64 {
    returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0
}

/// Weighted cumulative return in percent.
///
/// Each asset is compounded over its own return series.
pub fn cumulative_return_pct(asset_returns: &[Vec<f64>], weights: &[f64]) -> f64 {
    asset_returns
        .iter()
        .zip(weights)
        .map(|(returns, w)| w * compound_return(returns))
        .sum::<f64>()
        * 100.0
}

/// Absolute return in the base currency.
pub fn dollar_return(asset_returns: &[Vec<f64>], start_values: &[f64]) -> f64 {
    asset_returns
        .iter()
        .zip(start_values)
        .map(|(returns, value)| value * compound_return(returns))
        .sum()
}

/// Weighted portfolio return per date.
///
/// All asset return series must share one calendar; the result has the
/// length of the shortest series.
pub fn portfolio_returns(asset_returns: &[Vec<f64>], weights: &[f64]) -> Vec<f64> {
    let len = asset_returns.iter().map(Vec::len).min().unwrap_or(0);

    (0..len)
        .map(|t| {
            asset_returns
                .iter()
                .zip(weights)
                .map(|(returns, w)| w * returns[t])
                .sum::<f64>()
        })
        .collect()
}

/// Compound a mean daily return into an annual return.
pub fn annualize_daily_mean(mean: f64) -> f64 {
    (1.0 + mean).powf(TRADING_DAYS) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_returns() {
        let returns = simple_returns(&[100.0, 110.0, 121.0]);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[1], 0.1, epsilon = 1e-12);

        assert!(simple_returns(&[100.0]).is_empty());
    }

    #[test]
    fn test_weights_sum_to_one() {
        let w = weights(&[1000.0, 2500.0, 333.33, 0.01]).unwrap();
        assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(w[1] / w[0], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_weights_reject_non_positive_total() {
        assert!(matches!(weights(&[100.0, -100.0]), Err(Error::InvalidInput(_))));
        assert!(matches!(weights(&[]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_flat_series_has_zero_return() {
        let returns = vec![simple_returns(&[50.0, 50.0, 50.0, 50.0])];
        assert_eq!(cumulative_return_pct(&returns, &[1.0]), 0.0);
        assert_eq!(dollar_return(&returns, &[500.0]), 0.0);
    }

    #[test]
    fn test_cumulative_and_dollar_return() {
        // AAA: +21%, BBB: -10%
        let returns = vec![
            simple_returns(&[100.0, 110.0, 121.0]),
            simple_returns(&[50.0, 45.0]),
        ];
        let start_values = [1000.0, 1000.0];
        let w = weights(&start_values).unwrap();

        assert_relative_eq!(cumulative_return_pct(&returns, &w), 5.5, epsilon = 1e-9);
        assert_relative_eq!(dollar_return(&returns, &start_values), 110.0, epsilon = 1e-9);
    }

    #[test]
    fn test_portfolio_returns_weighted_sum() {
        let returns = vec![vec![0.02, -0.01], vec![-0.04, 0.03]];
        let r = portfolio_returns(&returns, &[0.75, 0.25]);

        assert_relative_eq!(r[0], 0.005, epsilon = 1e-12);
        assert_relative_eq!(r[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_annualize_daily_mean() {
        assert_eq!(annualize_daily_mean(0.0), 0.0);
        assert_relative_eq!(
            annualize_daily_mean(0.001),
            1.001_f64.powi(252) - 1.0,
            max_relative = 1e-12
        );
    }
}

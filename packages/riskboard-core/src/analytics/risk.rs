//! Portfolio risk metrics calculation.
//!
//! Provides Sharpe ratio, Sortino ratio, beta and alpha. Every ratio yields
//! `NaN` instead of an error when its denominator is zero or there are too
//! few observations.

use super::performance::annualize_daily_mean;
use super::{NEAR_ZERO, TRADING_DAYS};

/// Arithmetic mean, `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample covariance (n - 1 denominator), `NaN` with fewer than two pairs.
pub fn sample_covariance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return f64::NAN;
    }

    let (a, b) = (&a[..n], &b[..n]);
    let (mean_a, mean_b) = (mean(a), mean(b));
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / (n - 1) as f64
}

/// Sample variance (n - 1 denominator).
pub fn sample_variance(values: &[f64]) -> f64 {
    sample_covariance(values, values)
}

/// Population variance (n denominator), `NaN` for an empty slice.
pub fn population_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Downside deviation: `sqrt(mean(min(r, 0)^2))` over every return.
///
/// Gains count as zero. `NaN` for an empty slice, zero when nothing was lost.
pub fn downside_deviation(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return f64::NAN;
    }
    let squared: f64 = returns.iter().map(|r| r.min(0.0).powi(2)).sum();
    (squared / returns.len() as f64).sqrt()
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if !denominator.is_finite() || denominator.abs() < NEAR_ZERO {
        return f64::NAN;
    }
    numerator / denominator
}

/// Calculate Sharpe ratio from daily returns.
///
/// # Arguments
///
/// * `returns` - Daily portfolio returns
/// * `risk_free_rate` - Annual risk-free rate as a decimal
///
/// # Returns
///
/// `((1 + mean)^252 - 1 - rf) / (std * sqrt(252))`, or `NaN` if the volatility is zero.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let excess = annualize_daily_mean(mean(returns)) - risk_free_rate;
    safe_ratio(excess, sample_std(returns) * TRADING_DAYS.sqrt())
}

/// Calculate Sortino ratio from daily returns.
///
/// Same numerator as [`sharpe_ratio`]; the denominator is the annualized
/// [`downside_deviation`].
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let excess = annualize_daily_mean(mean(returns)) - risk_free_rate;
    safe_ratio(excess, downside_deviation(returns) * TRADING_DAYS.sqrt())
}

/// Beta of one return series against the benchmark returns.
///
/// Sample covariance (n - 1) over the population variance (n) of the
/// benchmark.
pub fn asset_beta(returns: &[f64], benchmark_returns: &[f64]) -> f64 {
    let n = returns.len().min(benchmark_returns.len());
    safe_ratio(
        sample_covariance(returns, benchmark_returns),
        population_variance(&benchmark_returns[..n]),
    )
}

/// Portfolio beta as the weighted average of the individual asset betas.
pub fn portfolio_beta(asset_returns: &[Vec<f64>], benchmark_returns: &[f64], weights: &[f64]) -> f64 {
    asset_returns
        .iter()
        .zip(weights)
        .map(|(returns, w)| w * asset_beta(returns, benchmark_returns))
        .sum()
}

/// Jensen's alpha on annualized returns.
///
/// `Rp - (rf + beta * (Rm - rf))` where `Rp` and `Rm` are the annualized
/// mean daily returns of the portfolio and the benchmark.
pub fn jensens_alpha(
    portfolio_returns: &[f64],
    benchmark_returns: &[f64],
    risk_free_rate: f64,
    beta: f64,
) -> f64 {
    let rp = annualize_daily_mean(mean(portfolio_returns));
    let rm = annualize_daily_mean(mean(benchmark_returns));
    rp - (risk_free_rate + beta * (rm - risk_free_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_statistics() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        // Sum of squared deviations is 32
        assert_relative_eq!(sample_variance(&values), 32.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(sample_std(&values), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);

        assert_relative_eq!(population_variance(&values), 4.0, epsilon = 1e-12);

        assert!(mean(&[]).is_nan());
        assert!(sample_variance(&[1.0]).is_nan());
        assert!(population_variance(&[]).is_nan());
    }

    #[test]
    fn test_sample_covariance() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 4.0, 6.0];
        assert_relative_eq!(sample_covariance(&a, &b), 2.0, epsilon = 1e-12);
        assert_relative_eq!(sample_covariance(&a, &[3.0, 2.0, 1.0]), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sharpe_ratio() {
        let returns = [0.01, -0.005, 0.008, -0.003, 0.012, -0.007, 0.005, 0.002];
        let sharpe = sharpe_ratio(&returns, 0.04);

        let expected = ((1.0 + mean(&returns)).powf(252.0) - 1.0 - 0.04)
            / (sample_std(&returns) * 252.0_f64.sqrt());
        assert_relative_eq!(sharpe, expected, epsilon = 1e-12);
        assert!(sharpe > 0.0);

        let losing: Vec<f64> = returns.iter().map(|r| r - 0.01).collect();
        assert!(sharpe_ratio(&losing, 0.04) < 0.0);
    }

    #[test]
    fn test_sharpe_ratio_undefined() {
        // Constant returns have zero volatility
        assert!(sharpe_ratio(&[0.001; 20], 0.0).is_nan());
        assert!(sharpe_ratio(&[0.01], 0.0).is_nan());
        assert!(sharpe_ratio(&[], 0.0).is_nan());
    }

    #[test]
    fn test_downside_deviation_counts_gains_as_zero() {
        // sqrt((0.0001 + 0.0004) / 5)
        let dd = downside_deviation(&[0.02, -0.01, 0.03, -0.02, 0.01]);
        assert_relative_eq!(dd, 0.01, epsilon = 1e-12);

        assert_eq!(downside_deviation(&[0.01, 0.0, 0.02]), 0.0);
        assert!(downside_deviation(&[]).is_nan());
    }

    #[test]
    fn test_sortino_ratio() {
        let returns = [0.02, -0.01, 0.03, -0.02, 0.01];
        let sortino = sortino_ratio(&returns, 0.0);

        let expected = ((1.0_f64 + 0.006).powf(252.0) - 1.0) / (0.01 * 252.0_f64.sqrt());
        assert_relative_eq!(sortino, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_sortino_ratio_without_losses() {
        assert!(sortino_ratio(&[0.01, 0.0, 0.02], 0.0).is_nan());
        assert!(sortino_ratio(&[], 0.0).is_nan());
    }

    #[test]
    fn test_asset_beta() {
        let market = [0.01, -0.02, 0.015, 0.005, -0.01];
        let levered: Vec<f64> = market.iter().map(|r| 2.0 * r).collect();
        // Sample covariance over population variance scales by n / (n - 1)
        assert_relative_eq!(asset_beta(&levered, &market), 2.5, epsilon = 1e-9);
        assert_relative_eq!(asset_beta(&market, &market), 1.25, epsilon = 1e-9);

        let asset = [0.02, -0.01, 0.015, 0.0, -0.005];
        // 0.00016875 / 0.00017
        assert_relative_eq!(asset_beta(&asset, &market), 135.0 / 136.0, epsilon = 1e-9);

        // Flat benchmark
        assert!(asset_beta(&market, &[0.0; 5]).is_nan());
    }

    #[test]
    fn test_portfolio_beta_is_weighted_average() {
        let market = vec![0.01, -0.02, 0.015, 0.005, -0.01];
        let assets = vec![
            market.iter().map(|r| 2.0 * r).collect::<Vec<_>>(),
            market.iter().map(|r| 0.5 * r).collect::<Vec<_>>(),
        ];

        let beta = portfolio_beta(&assets, &market, &[0.25, 0.75]);
        assert_relative_eq!(beta, (0.25 * 2.0 + 0.75 * 0.5) * 1.25, epsilon = 1e-9);
    }

    #[test]
    fn test_jensens_alpha() {
        let market = [0.01, -0.02, 0.015, 0.005, -0.01];

        // Tracking the market exactly leaves no alpha
        let alpha = jensens_alpha(&market, &market, 0.03, 1.0);
        assert_relative_eq!(alpha, 0.0, epsilon = 1e-12);

        // Zero beta: alpha is the excess over the risk-free rate
        let flat = [0.0; 5];
        let alpha = jensens_alpha(&flat, &market, 0.03, 0.0);
        assert_relative_eq!(alpha, -0.03, epsilon = 1e-12);
    }
}

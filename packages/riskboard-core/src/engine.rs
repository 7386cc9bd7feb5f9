//! Orchestration of the analytics pipeline.
//!
//! `Analyzer` drives price caching, currency normalization, alignment and the
//! metrics engine. Inner steps fail eagerly; the outcome is decided once here,
//! and the caller's caches are only replaced when the whole run succeeds.

use crate::align::{align, align_assets};
use crate::analytics::{compute_metrics, MetricsInput};
use crate::cache::Caches;
use crate::normalize::normalize;
use crate::portfolio::{merge_duplicates, parse_portfolio_text, sanitize_shares, SharesInput};
use crate::provider::{ExchangeRateSource, MetadataSource, PriceHistorySource};
use crate::types::{DateRange, MetricsResult, PortfolioPosition, PriceSeries, StockSummary};
use crate::{Error, Result};

/// Entry point of the analytics engine.
#[derive(Debug, Clone)]
pub struct Analyzer<P> {
    provider: P,
}

impl<P> Analyzer<P> {
    /// Create an analyzer fetching market data from `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get the market data provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: PriceHistorySource + MetadataSource> Analyzer<P> {
    /// Quote data and close-price history of a single asset.
    ///
    /// Not cached: every call fetches fresh data.
    pub fn compute_stock_summary(&self, asset_id: &str, range: DateRange) -> Result<StockSummary> {
        let asset_id = asset_id.trim();
        if asset_id.is_empty() {
            return Err(Error::InvalidInput("Ticker symbol is empty".to_string()));
        }

        let metadata = self.provider.fetch_asset_metadata(asset_id)?;
        let history = self.provider.fetch_price_history(asset_id, range)?;
        let series = PriceSeries::new(asset_id, history, range)?;

        Ok(StockSummary {
            asset_id: asset_id.to_string(),
            metadata,
            series,
        })
    }
}

impl<P: PriceHistorySource + ExchangeRateSource> Analyzer<P> {
    /// Compute metrics for a `"TICKER, SHARES"` portfolio text.
    ///
    /// `risk_free_rate_pct` is the annual risk-free rate in percent, as text.
    pub fn compute_portfolio_metrics(
        &self,
        portfolio_text: &str,
        range: DateRange,
        benchmark_id: &str,
        risk_free_rate_pct: &str,
        caches: &mut Caches,
    ) -> Result<MetricsResult> {
        let portfolio = parse_portfolio_text(portfolio_text)?;
        let risk_free_rate = parse_rate_pct(risk_free_rate_pct)?;
        self.compute(&portfolio, range, benchmark_id, risk_free_rate, caches)
    }

    /// Compute metrics for a portfolio of `(ticker, shares)` holdings.
    ///
    /// `risk_free_rate` is an annual decimal rate (0.04 for 4%). A ticker listed
    /// more than once keeps its last share count. On success the caches hold
    /// exactly the current portfolio's assets and benchmark; on failure they
    /// are left untouched.
    pub fn compute(
        &self,
        portfolio: &[(String, SharesInput)],
        range: DateRange,
        benchmark_id: &str,
        risk_free_rate: f64,
        caches: &mut Caches,
    ) -> Result<MetricsResult> {
        if portfolio.is_empty() {
            return Err(Error::InvalidInput("Portfolio is empty".to_string()));
        }
        let benchmark_id = benchmark_id.trim();
        if benchmark_id.is_empty() {
            return Err(Error::InvalidInput("Benchmark symbol is empty".to_string()));
        }
        if !risk_free_rate.is_finite() {
            return Err(Error::InvalidInput(format!(
                "Risk-free rate must be finite, got {}",
                risk_free_rate
            )));
        }

        let portfolio = merge_duplicates(portfolio.iter().cloned());

        tracing::info!(
            "Computing metrics for {} asset(s) against {} ({} to {})",
            portfolio.len(),
            benchmark_id,
            range.start,
            range.end
        );

        let mut staged = caches.clone();
        let result = self.run(&portfolio, range, benchmark_id, risk_free_rate, &mut staged);
        match result {
            Ok(metrics) => {
                *caches = staged;
                Ok(metrics)
            }
            Err(e) => {
                tracing::warn!("Portfolio computation failed: {}", e);
                Err(e)
            }
        }
    }

    fn run(
        &self,
        portfolio: &[(String, SharesInput)],
        range: DateRange,
        benchmark_id: &str,
        risk_free_rate: f64,
        caches: &mut Caches,
    ) -> Result<MetricsResult> {
        let fetch_history = |id: &str, r: DateRange| self.provider.fetch_price_history(id, r);

        let mut native = Vec::with_capacity(portfolio.len());
        let mut shares = Vec::with_capacity(portfolio.len());
        for (ticker, input) in portfolio {
            shares.push(sanitize_shares(ticker, input));
            native.push(caches.prices.get_or_fetch(ticker, range, fetch_history)?.clone());
        }

        let benchmark = caches
            .benchmark
            .get_or_fetch(benchmark_id, range, fetch_history)?
            .clone();

        let normalized = normalize(&native, &benchmark, &mut caches.rates, |from, to| {
            self.provider.fetch_exchange_rate(from, to)
        })?;

        let positions: Vec<PortfolioPosition> = normalized
            .assets
            .iter()
            .zip(&native)
            .zip(&shares)
            .map(|((series, original), count)| {
                PortfolioPosition::new(*count, original.currency(), series)
            })
            .collect();

        let assets_aligned = align_assets(&normalized.assets);
        let benchmark_aligned = align(&normalized.assets, &normalized.benchmark);

        let metrics = compute_metrics(MetricsInput {
            positions: &positions,
            series: &normalized.assets,
            assets_aligned: &assets_aligned,
            benchmark_aligned: &benchmark_aligned,
            risk_free_rate,
            base_currency: caches.rates.base(),
        })?;

        let tickers: Vec<&str> = portfolio.iter().map(|(t, _)| t.as_str()).collect();
        caches.prices.retain(&tickers);
        caches.benchmark.retain(&[benchmark_id]);

        Ok(metrics)
    }
}

/// Parse a percentage given as text into a decimal rate.
fn parse_rate_pct(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite())
        .map(|rate| rate / 100.0)
        .ok_or_else(|| Error::InvalidInput(format!("Risk-free rate is not a number: {:?}", text)))
}

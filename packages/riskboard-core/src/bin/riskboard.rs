//! Riskboard CLI - Command line interface for portfolio analytics.
//!
//! Every command prints an `ApiResponse` JSON document on stdout; logs go to stderr.

use anyhow::{bail, Context};
use chrono::{Local, Months, NaiveDate};
use clap::{Parser, Subcommand};
use riskboard_core::{
    Analyzer, ApiResponse, CacheStore, Config, DateRange, JsonFileProvider, MetricsDisplay,
    StockSummaryDisplay,
};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "riskboard")]
#[command(about = "Riskboard CLI - portfolio risk and return metrics")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.riskboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Market data directory, overriding the config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote summary of a single asset
    Summary {
        /// Ticker symbol
        #[arg(short, long)]
        symbol: String,
        /// First day of the history (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day of the history (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Risk and return metrics of a portfolio
    Portfolio {
        /// Holdings as "TICKER, SHARES" lines
        #[arg(short, long, conflicts_with = "file")]
        portfolio: Option<String>,
        /// File holding "TICKER, SHARES" lines
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// First day of the analysis window (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day of the analysis window (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Benchmark symbol
        #[arg(short, long)]
        benchmark: Option<String>,
        /// Annual risk-free rate in percent
        #[arg(short, long)]
        risk_free: Option<String>,
    },
    /// List cached exchange rates
    Rates,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let output = match cli.command {
        Commands::Summary { symbol, start, end } => {
            let range = resolve_range(&config, start, end)?;
            handle_summary(&config, &symbol, range)?
        }
        Commands::Portfolio {
            portfolio,
            file,
            start,
            end,
            benchmark,
            risk_free,
        } => {
            let text = match (portfolio, file) {
                (Some(text), _) => text,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read portfolio file {}", path.display()))?,
                (None, None) => bail!("Either --portfolio or --file is required"),
            };
            let range = resolve_range(&config, start, end)?;
            let benchmark = benchmark.unwrap_or_else(|| config.default_benchmark.clone());
            let risk_free =
                risk_free.unwrap_or_else(|| config.default_risk_free_rate_pct.to_string());
            handle_portfolio(&config, &text, range, &benchmark, &risk_free)?
        }
        Commands::Rates => handle_rates(&config)?,
    };

    println!("{}", output);
    Ok(())
}

/// Fill missing bounds: the window ends today and spans the configured lookback.
fn resolve_range(
    config: &Config,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> anyhow::Result<DateRange> {
    let end = end.unwrap_or_else(|| Local::now().date_naive());
    let start = match start {
        Some(start) => start,
        None => end
            .checked_sub_months(Months::new(12 * config.default_lookback_years))
            .context("Lookback window starts before the supported calendar")?,
    };
    Ok(DateRange::new(start, end)?)
}

fn open_store(config: &Config) -> anyhow::Result<CacheStore> {
    let path = config
        .cache_file
        .clone()
        .unwrap_or_else(CacheStore::default_path);
    Ok(CacheStore::with_path(path, &config.base_currency)?)
}

fn render<T: Serialize>(response: &ApiResponse<T>) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}

fn handle_summary(config: &Config, symbol: &str, range: DateRange) -> anyhow::Result<String> {
    let analyzer = Analyzer::new(JsonFileProvider::new(&config.data_dir));

    match analyzer.compute_stock_summary(symbol, range) {
        Ok(summary) => render(&ApiResponse::ok(json!({
            "summary": summary,
            "display": StockSummaryDisplay::from(&summary),
        }))),
        Err(e) => render(&ApiResponse::err_with(
            e.to_string(),
            json!({
                "kind": e.kind(),
                "display": StockSummaryDisplay::placeholder(),
            }),
        )),
    }
}

fn handle_portfolio(
    config: &Config,
    text: &str,
    range: DateRange,
    benchmark: &str,
    risk_free_pct: &str,
) -> anyhow::Result<String> {
    let analyzer = Analyzer::new(JsonFileProvider::new(&config.data_dir));
    let mut store = open_store(config)?;

    match analyzer.compute_portfolio_metrics(
        text,
        range,
        benchmark,
        risk_free_pct,
        store.caches_mut(),
    ) {
        Ok(metrics) => {
            store.save()?;
            render(&ApiResponse::ok(json!({
                "metrics": metrics,
                "display": MetricsDisplay::from(&metrics),
            })))
        }
        Err(e) => render(&ApiResponse::err_with(
            e.to_string(),
            json!({
                "kind": e.kind(),
                "display": MetricsDisplay::placeholder(),
            }),
        )),
    }
}

fn handle_rates(config: &Config) -> anyhow::Result<String> {
    let store = open_store(config)?;
    let rates = &store.caches().rates;
    let entries: serde_json::Map<String, serde_json::Value> = rates
        .iter()
        .map(|(currency, rate)| (currency.to_string(), json!(rate)))
        .collect();

    render(&ApiResponse::ok(json!({
        "base_currency": rates.base(),
        "rates": entries,
        "cached_assets": store.caches().prices.asset_ids().collect::<Vec<_>>(),
        "benchmark": store.caches().benchmark.asset_ids().collect::<Vec<_>>(),
    })))
}

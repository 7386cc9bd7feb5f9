//! Currency normalization of asset and benchmark series.

use crate::cache::ExchangeRateCache;
use crate::types::PriceSeries;
use crate::Result;
use std::collections::BTreeMap;

/// Asset and benchmark series expressed in the base currency.
#[derive(Debug, Clone)]
pub struct NormalizedSet {
    /// Asset series, in input order
    pub assets: Vec<PriceSeries>,
    pub benchmark: PriceSeries,
    /// Rate applied per native currency (base currency included at 1.0)
    pub applied_rates: BTreeMap<String, f64>,
}

/// Convert every series into the base currency of `rates`.
///
/// Each distinct currency is resolved once through the cache; misses go to
/// `fetch(from, base)` and successful rates stay cached. Any fetch failure is
/// returned before a single series is converted.
pub fn normalize<F>(
    assets: &[PriceSeries],
    benchmark: &PriceSeries,
    rates: &mut ExchangeRateCache,
    mut fetch: F,
) -> Result<NormalizedSet>
where
    F: FnMut(&str, &str) -> Result<Option<f64>>,
{
    let mut applied_rates = BTreeMap::new();
    for series in assets.iter().chain(std::iter::once(benchmark)) {
        let currency = series.currency();
        if applied_rates.contains_key(currency) {
            continue;
        }
        let rate = rates.get_or_fetch(currency, |from, to| fetch(from, to))?;
        applied_rates.insert(currency.to_string(), rate);
    }

    let base = rates.base().to_string();
    let convert = |series: &PriceSeries| {
        let rate = applied_rates[series.currency()];
        if series.currency() == base {
            series.clone()
        } else {
            series.converted(rate, &base)
        }
    };

    let assets = assets.iter().map(&convert).collect();
    let benchmark = convert(benchmark);

    Ok(NormalizedSet {
        assets,
        benchmark,
        applied_rates,
    })
}

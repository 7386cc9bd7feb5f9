//! Portfolio input parsing and share-count sanitization.

use crate::{Error, Result};

/// A share count as supplied by the caller, before sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharesInput {
    /// Already numeric
    Count(i64),
    /// Free text, e.g. from a form field
    Text(String),
}

impl From<i64> for SharesInput {
    fn from(count: i64) -> Self {
        SharesInput::Count(count)
    }
}

impl From<&str> for SharesInput {
    fn from(text: &str) -> Self {
        SharesInput::Text(text.to_string())
    }
}

/// Input-sanitization policy for share counts.
///
/// Contract: a zero count or text that is not an integer becomes 1 share;
/// any other integer (including negative counts) is kept as is. Every
/// substitution is logged at `warn` level.
pub fn sanitize_shares(asset_id: &str, input: &SharesInput) -> i64 {
    let parsed = match input {
        SharesInput::Count(count) => Some(*count),
        SharesInput::Text(text) => text.trim().parse::<i64>().ok(),
    };

    match parsed {
        Some(count) if count != 0 => count,
        _ => {
            tracing::warn!(
                "Share count {:?} for {} is not a non-zero integer, using 1",
                input,
                asset_id
            );
            1
        }
    }
}

/// Parse newline-separated `"TICKER, SHARES"` lines.
///
/// Tickers and share counts are trimmed; blank lines are skipped. A line
/// without exactly one comma or with an empty ticker fails the whole parse.
/// A ticker listed twice keeps its first position and its last share count.
pub fn parse_portfolio_text(text: &str) -> Result<Vec<(String, SharesInput)>> {
    let mut portfolio: Vec<(String, SharesInput)> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let (ticker, shares) = line
            .split_once(',')
            .filter(|(_, shares)| !shares.contains(','))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Line {}: expected \"TICKER, SHARES\", got {:?}",
                    idx + 1,
                    line
                ))
            })?;

        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(Error::InvalidInput(format!("Line {}: missing ticker", idx + 1)));
        }

        portfolio.push((ticker.to_string(), SharesInput::from(shares.trim())));
    }

    if portfolio.is_empty() {
        return Err(Error::InvalidInput("Portfolio is empty".to_string()));
    }

    Ok(merge_duplicates(portfolio))
}

/// Collapse repeated tickers: each keeps its first position and its last
/// share count.
pub fn merge_duplicates<I>(holdings: I) -> Vec<(String, SharesInput)>
where
    I: IntoIterator<Item = (String, SharesInput)>,
{
    let mut merged: Vec<(String, SharesInput)> = Vec::new();
    for (ticker, shares) in holdings {
        match merged.iter_mut().find(|(t, _)| *t == ticker) {
            Some(entry) => {
                tracing::debug!("Ticker {} listed more than once, keeping the last count", ticker);
                entry.1 = shares;
            }
            None => merged.push((ticker, shares)),
        }
    }
    merged
}

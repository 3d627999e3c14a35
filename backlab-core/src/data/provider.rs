//! Market data provider trait and structured error types.
//!
//! The trait abstracts over data sources (Yahoo Finance, CSV files, synthetic
//! random walks) so the runner can swap implementations and tests can mock them.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use super::canonicalize::canonicalize;
use crate::domain::Bar;

/// Failure to acquire market data.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no data for '{ticker}' between {start} and {end}")]
    DataUnavailable {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("symbol not found: {ticker}")]
    SymbolNotFound { ticker: String },

    #[error("network unreachable: {0}")]
    Network(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("provider has blocked requests (circuit breaker open)")]
    CircuitOpen,

    #[error("I/O error reading {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("malformed CSV in {path}: {reason}")]
    Csv { path: String, reason: String },
}

/// A source of daily OHLCV bars.
///
/// Implementors provide [`fetch_raw`](Self::fetch_raw); callers use
/// [`fetch`](Self::fetch), which returns the canonical series or fails with
/// [`ProviderError::DataUnavailable`].
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch bars as the source delivers them: possibly unordered, duplicated,
    /// or spilling outside the requested range.
    fn fetch_raw(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, ProviderError>;

    /// Fetch the ordered, date-deduplicated series for `[start, end]`.
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, ProviderError> {
        let raw = self.fetch_raw(ticker, start, end)?;
        let raw_len = raw.len();
        let bars = canonicalize(raw, start, end);
        debug!(
            provider = self.name(),
            ticker,
            raw = raw_len,
            kept = bars.len(),
            "fetched bars"
        );
        if bars.is_empty() {
            return Err(ProviderError::DataUnavailable {
                ticker: ticker.to_string(),
                start,
                end,
            });
        }
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Bar>);

    impl MarketDataProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch_raw(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<Vec<Bar>, ProviderError> {
            Ok(self.0.clone())
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: date(day),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    #[test]
    fn fetch_canonicalizes() {
        let provider = Fixed(vec![bar(3, 3.0), bar(2, 2.0), bar(3, 30.0)]);
        let bars = provider.fetch("X", date(1), date(31)).unwrap();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![2.0, 30.0]);
    }

    #[test]
    fn fetch_outside_range_is_unavailable() {
        let provider = Fixed(vec![bar(2, 2.0)]);
        let err = provider.fetch("X", date(10), date(20)).unwrap_err();
        assert!(matches!(err, ProviderError::DataUnavailable { .. }));
    }
}

//! PriceSeries: the validated, read-only input of a simulation run.
//!
//! Construction enforces the data-quality contract: at least one bar,
//! dates strictly increasing, every price finite and every close positive. Anything
//! else is a `DataError` raised before the bar loop starts.

use chrono::NaiveDate;
use thiserror::Error;

use super::bar::Bar;

/// Data-quality errors for price series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("price series for '{ticker}' is empty")]
    Empty { ticker: String },

    #[error("dates must be strictly increasing: bar {index} ({date}) does not follow {previous}")]
    NonIncreasingDates {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("malformed bar at index {index} ({date}): {reason}")]
    MalformedBar {
        index: usize,
        date: NaiveDate,
        reason: String,
    },

    #[error("insufficient data: {available} bars available, warm-up requires at least {required}")]
    InsufficientBars { required: usize, available: usize },
}

/// Ordered sequence of daily bars for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validate and wrap a bar vector.
    pub fn new(ticker: impl Into<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        let ticker = ticker.into();
        if bars.is_empty() {
            return Err(DataError::Empty { ticker });
        }

        for (index, bar) in bars.iter().enumerate() {
            if bar.has_non_finite() {
                return Err(DataError::MalformedBar {
                    index,
                    date: bar.date,
                    reason: format!(
                        "prices must be finite, got open={} high={} low={} close={}",
                        bar.open, bar.high, bar.low, bar.close
                    ),
                });
            }
            if bar.close <= 0.0 {
                return Err(DataError::MalformedBar {
                    index,
                    date: bar.date,
                    reason: format!("close must be finite and positive, got {}", bar.close),
                });
            }
            if index > 0 {
                let previous = bars[index - 1].date;
                if bar.date <= previous {
                    return Err(DataError::NonIncreasingDates {
                        index,
                        previous,
                        date: bar.date,
                    });
                }
            }
        }

        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    /// Fail unless the series holds at least `required` bars.
    pub fn require_len(&self, required: usize) -> Result<(), DataError> {
        if self.bars.len() < required {
            return Err(DataError::InsufficientBars {
                required,
                available: self.bars.len(),
            });
        }
        Ok(())
    }

    /// Deterministic BLAKE3 hash over dates and OHLCV values.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.ticker.as_bytes());
        for bar in &self.bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

//! Streaming indicators.
//!
//! An indicator is advanced once per bar by the engine and returns its value
//! for that bar, or `None` while its lookback window is still filling. Since
//! `update` only ever sees the bars handed to it so far, no value at bar t can
//! depend on bar t+1 or later.

pub mod ema;
pub mod sma;

pub use ema::Ema;
pub use sma::Sma;

use std::collections::BTreeMap;

use crate::domain::Bar;

/// Stateful, causal per-bar indicator.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20"). Strategies look values up by it.
    fn name(&self) -> &str;

    /// Number of bars before the first ready value (first valid index).
    fn lookback(&self) -> usize;

    /// Consume the next bar and return the value at that bar.
    fn update(&mut self, bar: &Bar) -> Option<f64>;

    /// Clear all accumulated state.
    fn reset(&mut self);
}

/// Feed a whole bar slice through an indicator, collecting one value per bar.
///
/// The indicator is reset first, so the result depends only on `bars`.
pub fn indicator_series(indicator: &mut dyn Indicator, bars: &[Bar]) -> Vec<Option<f64>> {
    indicator.reset();
    bars.iter().map(|bar| indicator.update(bar)).collect()
}

/// Indicator values at the current bar, keyed by indicator name.
///
/// A missing key and a `None` value both mean "not ready".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSnapshot {
    values: BTreeMap<String, Option<f64>>,
}

impl IndicatorSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<f64>) {
        self.values.insert(name.into(), value);
    }

    /// Ready value for `name`, or `None` if absent or still warming up.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    pub fn is_ready(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

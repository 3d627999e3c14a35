//! Indicator bookkeeping for the bar loop.

use crate::domain::Bar;
use crate::indicators::{Indicator, IndicatorSnapshot};

/// Advance every indicator with `bar` and collect their values.
pub fn advance_indicators(indicators: &mut [Box<dyn Indicator>], bar: &Bar) -> IndicatorSnapshot {
    let mut snapshot = IndicatorSnapshot::new();
    for indicator in indicators.iter_mut() {
        let value = indicator.update(bar);
        snapshot.insert(indicator.name(), value);
    }
    snapshot
}

/// Warm-up length for a set of indicators: the maximum lookback.
///
/// No indicator-driven order can fire during the warm-up period.
pub fn compute_warmup(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators.iter().map(|i| i.lookback()).max().unwrap_or(0)
}

//! Performance metrics: pure functions over an equity value series.
//!
//! Every metric is computed at full precision. Rounding happens only when a
//! [`MetricsReport`] is built for the response boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trading days per year used to annualize the Sharpe ratio.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Standard deviations below this are treated as zero.
const ZERO_VARIANCE_EPSILON: f64 = 1e-15;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("equity curve is empty")]
    EmptyCurve,

    #[error("need at least one return, got {available} values")]
    InsufficientReturns { available: usize },

    #[error("returns have zero variance; Sharpe ratio is undefined")]
    ZeroVariance,

    #[error("non-positive portfolio value {value} at index {index}")]
    NonPositiveValue { index: usize, value: f64 },
}

// ─── Individual metric functions ────────────────────────────────────

/// Simple returns `v[i] / v[i-1] - 1`, one fewer than the input.
pub fn daily_returns(values: &[f64]) -> Result<Vec<f64>, MetricsError> {
    values
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            if w[0] <= 0.0 {
                Err(MetricsError::NonPositiveValue {
                    index: i,
                    value: w[0],
                })
            } else {
                Ok(w[1] / w[0] - 1.0)
            }
        })
        .collect()
}

/// `v[N-1] / v[0] - 1`.
pub fn total_return(values: &[f64]) -> Result<f64, MetricsError> {
    let (&first, &last) = match (values.first(), values.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(MetricsError::EmptyCurve),
    };
    if first <= 0.0 {
        return Err(MetricsError::NonPositiveValue {
            index: 0,
            value: first,
        });
    }
    Ok(last / first - 1.0)
}

/// Annualized Sharpe ratio: `mean(r) / std(r) × √252` with population std.
///
/// Fails with [`MetricsError::ZeroVariance`] when every return is equal,
/// including the single-return case.
pub fn sharpe_ratio(values: &[f64]) -> Result<f64, MetricsError> {
    if values.is_empty() {
        return Err(MetricsError::EmptyCurve);
    }
    let returns = daily_returns(values)?;
    if returns.is_empty() {
        return Err(MetricsError::InsufficientReturns {
            available: values.len(),
        });
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    if std < ZERO_VARIANCE_EPSILON {
        return Err(MetricsError::ZeroVariance);
    }
    Ok(mean / std * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Largest relative decline from a running peak, as a value ≤ 0.
///
/// `min over i of (v[i] / max(v[0..=i]) - 1)`; 0.0 when the series never
/// falls below an earlier peak.
pub fn max_drawdown(values: &[f64]) -> Result<f64, MetricsError> {
    let Some(&first) = values.first() else {
        return Err(MetricsError::EmptyCurve);
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for (index, &value) in values.iter().enumerate() {
        peak = peak.max(value);
        if peak <= 0.0 {
            return Err(MetricsError::NonPositiveValue { index, value: peak });
        }
        max_dd = max_dd.min(value / peak - 1.0);
    }
    Ok(max_dd)
}

// ─── Aggregate ──────────────────────────────────────────────────────

/// Full-precision metrics for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    /// NaN when undefined; see `sharpe_error`.
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    /// Why the Sharpe ratio could not be computed, if it could not.
    pub sharpe_error: Option<MetricsError>,
}

impl Metrics {
    /// Reduce an equity value series to summary metrics.
    ///
    /// Only total return and drawdown are required to succeed; a degenerate
    /// Sharpe ratio is reported as NaN with the reason attached.
    pub fn compute(values: &[f64]) -> Result<Self, MetricsError> {
        let total_return = total_return(values)?;
        let max_drawdown = max_drawdown(values)?;
        let (sharpe_ratio, sharpe_error) = match sharpe_ratio(values) {
            Ok(s) => (s, None),
            Err(e) => (f64::NAN, Some(e)),
        };
        Ok(Self {
            total_return,
            sharpe_ratio,
            max_drawdown,
            sharpe_error,
        })
    }

    pub fn report(&self) -> MetricsReport {
        MetricsReport::from(self)
    }
}

/// Rounded metrics as they appear in a response.
///
/// `total_return` and `max_drawdown` carry 4 decimals, `sharpe_ratio` 2.
/// An undefined Sharpe ratio serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub total_return: f64,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
}

impl From<&Metrics> for MetricsReport {
    fn from(m: &Metrics) -> Self {
        Self {
            total_return: round_to(m.total_return, 4),
            sharpe_ratio: m.sharpe_ratio.is_finite().then(|| round_to(m.sharpe_ratio, 2)),
            max_drawdown: round_to(m.max_drawdown, 4),
        }
    }
}

/// Round half away from zero to `decimals` places. Never returns `-0.0`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn total_return_monotonic() {
        assert_approx(total_return(&[100.0, 110.0, 121.0]).unwrap(), 0.21);
        assert_eq!(max_drawdown(&[100.0, 110.0, 121.0]).unwrap(), 0.0);
    }

    #[test]
    fn drawdown_from_peak() {
        assert_approx(max_drawdown(&[100.0, 80.0, 100.0]).unwrap(), -0.2);
        assert_approx(max_drawdown(&[100.0, 120.0, 90.0, 130.0, 117.0]).unwrap(), -0.25);
    }

    #[test]
    fn constant_series() {
        let values = [50.0; 10];
        assert_eq!(total_return(&values).unwrap(), 0.0);
        assert_eq!(max_drawdown(&values).unwrap(), 0.0);
        assert_eq!(sharpe_ratio(&values), Err(MetricsError::ZeroVariance));

        let m = Metrics::compute(&values).unwrap();
        assert!(m.sharpe_ratio.is_nan());
        assert_eq!(m.sharpe_error, Some(MetricsError::ZeroVariance));
        assert_eq!(m.report().sharpe_ratio, None);
    }

    #[test]
    fn sharpe_uses_population_std() {
        // returns: +10%, -10% → mean 0
        assert_approx(sharpe_ratio(&[100.0, 110.0, 99.0]).unwrap(), 0.0);

        // returns: 0.1, 0.0 → mean 0.05, population std 0.05
        let s = sharpe_ratio(&[100.0, 110.0, 110.0]).unwrap();
        assert_approx(s, 252.0_f64.sqrt());
    }

    #[test]
    fn single_value_curve() {
        assert_eq!(total_return(&[10.0]).unwrap(), 0.0);
        assert_eq!(max_drawdown(&[10.0]).unwrap(), 0.0);
        assert_eq!(
            sharpe_ratio(&[10.0]),
            Err(MetricsError::InsufficientReturns { available: 1 })
        );
    }

    #[test]
    fn single_return_has_zero_variance() {
        assert_eq!(sharpe_ratio(&[10.0, 11.0]), Err(MetricsError::ZeroVariance));
    }

    #[test]
    fn empty_curve_fails() {
        assert_eq!(Metrics::compute(&[]), Err(MetricsError::EmptyCurve));
        assert_eq!(daily_returns(&[]).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn non_positive_start_fails() {
        assert!(matches!(
            total_return(&[0.0, 1.0]),
            Err(MetricsError::NonPositiveValue { index: 0, .. })
        ));
    }

    #[test]
    fn report_rounds_half_away_from_zero() {
        let m = Metrics {
            total_return: 0.123_46,
            sharpe_ratio: -0.125,
            max_drawdown: -0.000_04,
            sharpe_error: None,
        };
        let r = m.report();
        assert_eq!(r.total_return, 0.1235);
        assert_eq!(r.sharpe_ratio, Some(-0.13));
        assert_eq!(r.max_drawdown, 0.0);
        assert!(r.max_drawdown.is_sign_positive());
    }

    #[test]
    fn report_serializes_undefined_sharpe_as_null() {
        let m = Metrics::compute(&[1.0, 1.0, 1.0]).unwrap();
        let json = serde_json::to_value(m.report()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"total_return": 0.0, "sharpe_ratio": null, "max_drawdown": 0.0})
        );
    }
}

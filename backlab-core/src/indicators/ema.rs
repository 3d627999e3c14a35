//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
    alpha: f64,
    seen: usize,
    seed_sum: f64,
    prev: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
            alpha: 2.0 / (period as f64 + 1.0),
            seen: 0,
            seed_sum: 0.0,
            prev: None,
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.seen += 1;
        let next = match self.prev {
            Some(prev) => self.alpha * bar.close + (1.0 - self.alpha) * prev,
            None => {
                self.seed_sum += bar.close;
                if self.seen < self.period {
                    return None;
                }
                self.seed_sum / self.period as f64
            }
        };
        self.prev = Some(next);
        self.prev
    }

    fn reset(&mut self) {
        self.seen = 0;
        self.seed_sum = 0.0;
        self.prev = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, indicator_series, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_seeded_with_sma() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = indicator_series(&mut Ema::new(3), &bars);

        assert!(result[0].is_none());
        assert!(result[1].is_none());
        // Seed: SMA(10,11,12) = 11.0
        assert_approx(result[2].unwrap(), 11.0, DEFAULT_EPSILON);
        // alpha = 2/(3+1) = 0.5 → EMA[3] = 0.5*13 + 0.5*11 = 12.0
        assert_approx(result[3].unwrap(), 12.0, DEFAULT_EPSILON);
        // EMA[4] = 0.5*14 + 0.5*12 = 13.0
        assert_approx(result[4].unwrap(), 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_1_is_close() {
        let bars = make_bars(&[5.0, 7.0, 6.0]);
        let result = indicator_series(&mut Ema::new(1), &bars);
        assert_eq!(result, vec![Some(5.0), Some(7.0), Some(6.0)]);
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(10).lookback(), 9);
        assert_eq!(Ema::new(10).name(), "ema_10");
    }
}

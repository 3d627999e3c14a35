//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).
//!
//! The mean is recomputed from the window on every bar as an offset from
//! the oldest close, so a window of identical closes averages to exactly
//! that close no matter how long the series ran before it.

use std::collections::VecDeque;

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
    window: VecDeque<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
            window: VecDeque::with_capacity(period + 1),
        }
    }

    fn mean(&self) -> f64 {
        let anchor = self.window[0];
        let offset: f64 = self.window.iter().map(|&close| close - anchor).sum();
        anchor + offset / self.period as f64
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.window.push_back(bar.close);
        if self.window.len() > self.period {
            self.window.pop_front();
        }

        if self.window.len() < self.period {
            return None;
        }
        Some(self.mean())
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}

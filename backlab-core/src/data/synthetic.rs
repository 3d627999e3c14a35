//! Deterministic synthetic prices for offline runs.
//!
//! A seeded random walk starting at 100.0. The seed is the BLAKE3 hash of the
//! ticker, so the same ticker always yields the same series and different
//! tickers yield different ones. Weekends are skipped.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{MarketDataProvider, ProviderError};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    max_daily_move: f64,
}

impl SyntheticProvider {
    pub fn new(start_price: f64, max_daily_move: f64) -> Self {
        assert!(start_price > 0.0, "start price must be positive");
        assert!(
            (0.0..1.0).contains(&max_daily_move),
            "max daily move must be in [0, 1)"
        );
        Self {
            start_price,
            max_daily_move,
        }
    }

    pub fn generate(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
        let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut bars = Vec::new();
        let mut price = self.start_price;
        for date in start.iter_days().take_while(|d| *d <= end) {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }

            let change: f64 = if self.max_daily_move > 0.0 {
                rng.gen_range(-self.max_daily_move..self.max_daily_move)
            } else {
                0.0
            };
            let open = price;
            let close = price * (1.0 + change);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));

            bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                volume: rng.gen_range(500_000..5_000_000u64),
            });
            price = close;
        }
        bars
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(100.0, 0.03)
    }
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_raw(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, ProviderError> {
        Ok(self.generate(ticker, start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn deterministic_per_ticker() {
        let p = SyntheticProvider::default();
        let a = p.generate("SPY", d(2022, 1, 1), d(2022, 3, 1));
        let b = p.generate("SPY", d(2022, 1, 1), d(2022, 3, 1));
        let c = p.generate("QQQ", d(2022, 1, 1), d(2022, 3, 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn weekdays_only_and_sane() {
        let bars = SyntheticProvider::default().generate("SPY", d(2024, 1, 1), d(2024, 1, 14));
        assert_eq!(bars.len(), 10);
        for bar in &bars {
            assert!(!matches!(bar.date.weekday(), Weekday::Sat | Weekday::Sun));
            assert!(bar.is_sane());
            assert!(bar.close > 0.0);
        }
    }

    #[test]
    fn weekend_only_range_is_unavailable() {
        let err = SyntheticProvider::default()
            .fetch("SPY", d(2024, 1, 6), d(2024, 1, 7))
            .unwrap_err();
        assert!(matches!(err, ProviderError::DataUnavailable { .. }));
    }
}

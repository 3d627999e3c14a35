//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Determinism: identical inputs give identical runs
//! 2. Value conservation: every equity point equals cash + position × close
//! 3. State-machine legality: long-only momentum alternates BUY/SELL, never sells flat
//! 4. Warm-up gap: no order before the first ready indicator value

use chrono::NaiveDate;
use proptest::prelude::*;
use backlab_core::domain::{Bar, OrderSide, PriceSeries};
use backlab_core::engine::{run_backtest, BacktestError, EngineConfig, RunResult};
use backlab_core::strategy::{MaCrossover, MaType, Momentum};

// ─── Generators ─────────────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..500.0_f64, 1..150)
        .prop_map(|v| v.into_iter().map(|p| (p * 100.0).round() / 100.0).collect())
}

fn series_from(closes: &[f64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        })
        .collect();
    PriceSeries::new("PROP", bars).unwrap()
}

fn run_momentum(closes: &[f64], period: usize, size: f64) -> Result<RunResult, BacktestError> {
    run_backtest(&series_from(closes), &Momentum::new(period, size), &EngineConfig::default())
}

// ─── Properties ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn runs_are_deterministic(closes in arb_closes(), period in 1usize..30) {
        let a = run_momentum(&closes, period, 10.0);
        let b = run_momentum(&closes, period, 10.0);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn short_series_fail_with_data_error(closes in arb_closes(), period in 1usize..30) {
        let result = run_momentum(&closes, period, 1.0);
        if closes.len() < period {
            prop_assert!(matches!(result, Err(BacktestError::Data(_))));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn equity_equals_cash_plus_position(closes in arb_closes(), period in 1usize..20, size in 1.0..50.0_f64) {
        prop_assume!(closes.len() >= period);
        let result = run_momentum(&closes, period, size).unwrap();
        prop_assert_eq!(result.equity_curve.len(), closes.len());

        let mut cash = EngineConfig::default().initial_cash;
        let mut position = 0.0;
        let mut next_trade = 0;
        for (i, point) in result.equity_curve.iter().enumerate() {
            let expected = cash + position * closes[i];
            prop_assert!((point.value - expected).abs() < 1e-6, "bar {}: {} vs {}", i, point.value, expected);
            if let Some(trade) = result.trades.get(next_trade) {
                if trade.date == point.date {
                    let signed = trade.action.sign() * trade.size;
                    cash -= signed * trade.price;
                    position += signed;
                    next_trade += 1;
                }
            }
        }
        prop_assert_eq!(next_trade, result.trades.len());
        let last = closes[closes.len() - 1];
        prop_assert!((result.final_value - (cash + position * last)).abs() < 1e-6);
    }

    #[test]
    fn momentum_alternates_and_never_shorts(closes in arb_closes(), period in 1usize..20) {
        prop_assume!(closes.len() >= period);
        let result = run_momentum(&closes, period, 10.0).unwrap();

        let mut position = 0.0;
        for (i, trade) in result.trades.iter().enumerate() {
            let expected = if i % 2 == 0 { OrderSide::Buy } else { OrderSide::Sell };
            prop_assert_eq!(trade.action, expected);
            position += trade.action.sign() * trade.size;
            prop_assert!(position >= 0.0);
        }
        prop_assert!(result.final_position == 0.0 || result.final_position == 10.0);
    }

    #[test]
    fn no_orders_before_warmup(closes in arb_closes(), fast in 1usize..10, gap in 1usize..15) {
        let slow = fast + gap;
        prop_assume!(closes.len() >= slow);
        let series = series_from(&closes);
        let result = run_backtest(
            &series,
            &MaCrossover::new(fast, slow, MaType::Ema, 1.0),
            &EngineConfig::default(),
        )
        .unwrap();

        prop_assert_eq!(result.warmup_bars, slow - 1);
        let first_ready = series.bars()[slow - 1].date;
        for trade in &result.trades {
            prop_assert!(trade.date >= first_ready);
        }
    }
}

//! Engine configuration, mutable state, and run result types.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::domain::{EquityPoint, Portfolio, TradeRecord};

/// Default starting cash, matching the usual broker simulation default.
pub const DEFAULT_INITIAL_CASH: f64 = 10_000.0;

/// Configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Must be finite and positive; anything else fails deserialization.
    #[serde(deserialize_with = "positive_cash")]
    pub initial_cash: f64,
    /// Let sells drive the position below zero. Off by default: such
    /// orders are rejected and abort the run.
    pub allow_short: bool,
}

impl EngineConfig {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            initial_cash,
            allow_short: false,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CASH)
    }
}

fn positive_cash<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let cash = f64::deserialize(deserializer)?;
    if !cash.is_finite() || cash <= 0.0 {
        return Err(de::Error::custom(format!(
            "initial_cash must be finite and positive, got {cash}"
        )));
    }
    Ok(cash)
}

/// Mutable state that evolves bar-by-bar during one run.
///
/// Owned by the loop for the duration of the run; nothing outside sees it
/// until the run returns.
#[derive(Debug)]
pub struct EngineState {
    pub portfolio: Portfolio,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<TradeRecord>,
}

impl EngineState {
    pub fn new(config: &EngineConfig, capacity: usize) -> Self {
        Self {
            portfolio: Portfolio::new(config.initial_cash).with_short_selling(config.allow_short),
            equity_curve: Vec::with_capacity(capacity),
            trades: Vec::new(),
        }
    }

    /// Record the portfolio value at `price` and return it.
    ///
    /// Checks the accounting identity `value == cash + size × price` in debug builds.
    pub fn record_equity(&mut self, date: chrono::NaiveDate, price: f64) -> f64 {
        let value = self.portfolio.value(price);

        #[cfg(debug_assertions)]
        {
            let expected = self.portfolio.cash + self.portfolio.position.size * price;
            assert!(
                (value - expected).abs() < 1e-9,
                "equity accounting violated: value={value}, cash={} + position={} = {expected}",
                self.portfolio.cash,
                self.portfolio.position.size * price
            );
        }

        self.equity_curve.push(EquityPoint { date, value });
        value
    }
}

/// Result of a complete backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Pre-decision portfolio value at every bar, in bar order.
    pub equity_curve: Vec<EquityPoint>,
    /// One record per executed order, in execution order.
    pub trades: Vec<TradeRecord>,
    /// Portfolio value at the last bar's close, after its order (if any).
    pub final_value: f64,
    pub initial_cash: f64,
    /// Cash and position left at the end of the run.
    pub final_cash: f64,
    pub final_position: f64,
    pub realized_pnl: f64,
    pub bar_count: usize,
    pub warmup_bars: usize,
}

impl RunResult {
    /// Values only, the input of the metrics calculator.
    pub fn values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|p| p.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_cash, 10_000.0);
        assert!(!config.allow_short);
    }

    #[test]
    fn engine_config_rejects_non_positive_cash() {
        for text in [r#"{"initial_cash": 0}"#, r#"{"initial_cash": -250.0}"#] {
            let err = serde_json::from_str::<EngineConfig>(text).unwrap_err();
            assert!(err.to_string().contains("initial_cash must be finite and positive"));
        }
        let config: EngineConfig = serde_json::from_str(r#"{"allow_short": true}"#).unwrap();
        assert_eq!(config.initial_cash, DEFAULT_INITIAL_CASH);
    }

    #[test]
    fn engine_state_initial() {
        let state = EngineState::new(&EngineConfig::new(5_000.0), 10);
        assert_eq!(state.portfolio.cash, 5_000.0);
        assert!(state.portfolio.position.is_flat());
        assert!(state.equity_curve.is_empty());
        assert!(state.trades.is_empty());
    }

    #[test]
    fn record_equity_appends_point() {
        let mut state = EngineState::new(&EngineConfig::default(), 1);
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let value = state.record_equity(date, 42.0);
        assert_eq!(value, 10_000.0);
        assert_eq!(state.equity_curve, vec![EquityPoint { date, value }]);
    }

    #[test]
    fn engine_config_from_partial_toml_like_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"allow_short": true}"#).unwrap();
        assert_eq!(config.initial_cash, 10_000.0);
        assert!(config.allow_short);
    }
}

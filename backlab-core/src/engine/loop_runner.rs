//! Bar-by-bar simulation loop.
//!
//! Per bar:
//! 1. Advance indicators with the bar
//! 2. Mark to market at the close and record the equity point
//! 3. Ask the strategy for a decision
//! 4. Fill the order at the close, or abort on rejection

use tracing::{debug, info, warn};

use crate::domain::{Order, PriceSeries, TradeRecord};
use crate::strategy::Strategy;

use super::error::{BacktestError, SimulationError};
use super::precompute::{advance_indicators, compute_warmup};
use super::state::{EngineConfig, EngineState, RunResult};

/// Drives one strategy over one price series.
///
/// The engine holds only configuration, so one instance can run any number
/// of backtests, sequentially or from several threads.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    config: EngineConfig,
}

impl SimulationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `strategy` over every bar of `series`.
    ///
    /// Fails with [`BacktestError::Data`] when the series is shorter than the
    /// strategy's warm-up plus one decision bar, and with
    /// [`BacktestError::Simulation`] when the portfolio rejects an order.
    pub fn run(
        &self,
        series: &PriceSeries,
        strategy: &dyn Strategy,
    ) -> Result<RunResult, BacktestError> {
        let mut indicators = strategy.indicators();
        let warmup_bars = compute_warmup(&indicators).max(strategy.warmup_bars());
        series.require_len(warmup_bars + 1)?;

        debug!(
            ticker = series.ticker(),
            strategy = strategy.name(),
            bars = series.len(),
            warmup_bars,
            "starting simulation"
        );

        let mut state = EngineState::new(&self.config, series.len());

        for (bar_index, bar) in series.bars().iter().enumerate() {
            let snapshot = advance_indicators(&mut indicators, bar);
            state.record_equity(bar.date, bar.close);

            let Some(order) = strategy.decide(bar, &snapshot, &state.portfolio.view()) else {
                continue;
            };
            let order = Order {
                date: bar.date,
                price: bar.close,
                ..order
            };

            if let Err(reason) = state.portfolio.apply_order(&order) {
                warn!(bar_index, date = %bar.date, %reason, "order rejected, aborting run");
                return Err(SimulationError {
                    bar_index,
                    date: bar.date,
                    reason,
                    partial_equity: state.equity_curve,
                }
                .into());
            }

            debug!(
                bar_index,
                date = %bar.date,
                action = order.side.as_str(),
                price = order.price,
                size = order.size,
                cash = state.portfolio.cash,
                position = state.portfolio.position.size,
                "order filled"
            );
            state.trades.push(TradeRecord::from(&order));
        }

        let last_close = series.bars()[series.len() - 1].close;
        let final_value = state.portfolio.value(last_close);

        info!(
            ticker = series.ticker(),
            strategy = strategy.name(),
            bars = series.len(),
            trades = state.trades.len(),
            final_value,
            "simulation complete"
        );

        Ok(RunResult {
            final_value,
            initial_cash: self.config.initial_cash,
            final_cash: state.portfolio.cash,
            final_position: state.portfolio.position.size,
            realized_pnl: state.portfolio.realized_pnl,
            bar_count: series.len(),
            warmup_bars,
            equity_curve: state.equity_curve,
            trades: state.trades,
        })
    }
}

/// Run a backtest with the given configuration.
///
/// Convenience wrapper around [`SimulationEngine::run`].
pub fn run_backtest(
    series: &PriceSeries,
    strategy: &dyn Strategy,
    config: &EngineConfig,
) -> Result<RunResult, BacktestError> {
    SimulationEngine::new(config.clone()).run(series, strategy)
}

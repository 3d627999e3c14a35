//! Engine error taxonomy.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{DataError, EquityPoint, OrderRejection};
use crate::strategy::ConfigError;

/// An order the portfolio refused, which aborts the run at that bar.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("order rejected at bar {bar_index} ({date}): {reason}")]
pub struct SimulationError {
    pub bar_index: usize,
    pub date: NaiveDate,
    #[source]
    pub reason: OrderRejection,
    /// Equity recorded up to and including the offending bar.
    pub partial_equity: Vec<EquityPoint>,
}

/// Any failure of a single backtest run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

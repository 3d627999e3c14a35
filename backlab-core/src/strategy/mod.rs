//! Strategies: per-bar decision units.
//!
//! A strategy sees the current bar, the indicator snapshot for that bar and a
//! read-only view of the portfolio, and returns at most one order. It holds no
//! run state of its own: position intent is read back from the portfolio, and
//! the engine owns the equity curve and trade log.
//!
//! New variants implement [`Strategy`] and are added to a [`StrategyRegistry`];
//! the engine never needs to change.

pub mod buy_and_hold;
pub mod ma_crossover;
pub mod momentum;
pub mod params;
pub mod registry;

pub use buy_and_hold::BuyAndHold;
pub use ma_crossover::{MaCrossover, MaType};
pub use momentum::Momentum;
pub use params::StrategyParams;
pub use registry::{StrategyBuilder, StrategyRegistry};

use thiserror::Error;

use crate::domain::{Bar, Order, PortfolioView};
use crate::indicators::{Indicator, IndicatorSnapshot};

/// Errors raised while resolving a strategy and its parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown strategy '{name}' (available: {available})")]
    UnknownStrategy { name: String, available: String },

    #[error("unknown parameter '{param}' for strategy '{strategy}'")]
    UnknownParameter { strategy: String, param: String },

    #[error("invalid parameter '{param}' for strategy '{strategy}': {reason}")]
    InvalidParameter {
        strategy: String,
        param: String,
        reason: String,
    },
}

/// Decision interface shared by every strategy variant.
pub trait Strategy: Send + Sync {
    /// Registry name (e.g., "momentum").
    fn name(&self) -> &str;

    /// Fresh indicator instances for one run. The engine owns and advances them.
    fn indicators(&self) -> Vec<Box<dyn Indicator>>;

    /// Bars before every indicator this strategy needs is ready.
    fn warmup_bars(&self) -> usize {
        self.indicators()
            .iter()
            .map(|i| i.lookback())
            .max()
            .unwrap_or(0)
    }

    /// Decide on the current bar. Must return `None` when a required
    /// indicator is not ready.
    fn decide(
        &self,
        bar: &Bar,
        indicators: &IndicatorSnapshot,
        portfolio: &PortfolioView,
    ) -> Option<Order>;
}

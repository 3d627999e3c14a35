//! Momentum strategy: price versus its simple moving average.
//!
//! Two states, read from the portfolio:
//! - FLAT → LONG when close > SMA: BUY `size` at the close.
//! - LONG → FLAT when close < SMA: SELL `size` at the close.
//!
//! Ties never trade, and nothing happens while the SMA is warming up.

use crate::domain::{Bar, Order, PortfolioView};
use crate::indicators::{Indicator, IndicatorSnapshot, Sma};

use super::{ConfigError, Strategy, StrategyParams};

pub const NAME: &str = "momentum";
pub const DEFAULT_SMA_PERIOD: usize = 20;
pub const DEFAULT_SIZE: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct Momentum {
    pub sma_period: usize,
    pub size: f64,
    sma_key: String,
}

impl Momentum {
    pub fn new(sma_period: usize, size: f64) -> Self {
        assert!(sma_period >= 1, "sma_period must be >= 1");
        assert!(size > 0.0, "size must be > 0");
        Self {
            sma_period,
            size,
            sma_key: format!("sma_{sma_period}"),
        }
    }

    pub fn default_params() -> Self {
        Self::new(DEFAULT_SMA_PERIOD, DEFAULT_SIZE)
    }

    /// Build from request parameters (`sma_period`, `size`).
    pub fn from_params(params: &StrategyParams) -> Result<Self, ConfigError> {
        params.ensure_known(NAME, &["sma_period", "size"])?;
        let sma_period = params.period(NAME, "sma_period", DEFAULT_SMA_PERIOD)?;
        let size = params.positive(NAME, "size", DEFAULT_SIZE)?;
        Ok(Self::new(sma_period, size))
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &str {
        NAME
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Sma::new(self.sma_period))]
    }

    fn decide(
        &self,
        bar: &Bar,
        indicators: &IndicatorSnapshot,
        portfolio: &PortfolioView,
    ) -> Option<Order> {
        let sma = indicators.get(&self.sma_key)?;

        if portfolio.is_flat() {
            (bar.close > sma).then(|| Order::buy(bar.date, bar.close, self.size))
        } else {
            (bar.close < sma).then(|| Order::sell(bar.date, bar.close, self.size))
        }
    }
}

//! Buy-and-hold benchmark: buy `size` on the first bar, never sell.

use crate::domain::{Bar, Order, PortfolioView};
use crate::indicators::{Indicator, IndicatorSnapshot};

use super::{ConfigError, Strategy, StrategyParams};

pub const NAME: &str = "buy_and_hold";

#[derive(Debug, Clone)]
pub struct BuyAndHold {
    pub size: f64,
}

impl BuyAndHold {
    pub fn new(size: f64) -> Self {
        assert!(size > 0.0, "size must be > 0");
        Self { size }
    }

    pub fn from_params(params: &StrategyParams) -> Result<Self, ConfigError> {
        params.ensure_known(NAME, &["size"])?;
        Ok(Self::new(params.positive(NAME, "size", 10.0)?))
    }
}

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        NAME
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        Vec::new()
    }

    fn decide(
        &self,
        bar: &Bar,
        _indicators: &IndicatorSnapshot,
        portfolio: &PortfolioView,
    ) -> Option<Order> {
        portfolio
            .is_flat()
            .then(|| Order::buy(bar.date, bar.close, self.size))
    }
}

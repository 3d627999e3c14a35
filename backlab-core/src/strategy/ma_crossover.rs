//! Moving average regime strategy: fast MA versus slow MA.
//!
//! FLAT → LONG while the fast MA is above the slow MA; LONG → FLAT once it
//! drops below. Equal averages never trade.

use crate::domain::{Bar, Order, PortfolioView};
use crate::indicators::{Ema, Indicator, IndicatorSnapshot, Sma};

use super::{ConfigError, Strategy, StrategyParams};

pub const NAME: &str = "ma_crossover";

/// Moving average type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    Sma,
    Ema,
}

impl MaType {
    fn prefix(&self) -> &'static str {
        match self {
            MaType::Sma => "sma",
            MaType::Ema => "ema",
        }
    }

    fn build(&self, period: usize) -> Box<dyn Indicator> {
        match self {
            MaType::Sma => Box::new(Sma::new(period)),
            MaType::Ema => Box::new(Ema::new(period)),
        }
    }
}

/// # Indicator dependencies
/// - Fast: `{ma_type}_{fast_period}` (e.g., `sma_10`)
/// - Slow: `{ma_type}_{slow_period}` (e.g., `sma_50`)
#[derive(Debug, Clone)]
pub struct MaCrossover {
    pub fast_period: usize,
    pub slow_period: usize,
    pub ma_type: MaType,
    pub size: f64,
    fast_key: String,
    slow_key: String,
}

impl MaCrossover {
    pub fn new(fast_period: usize, slow_period: usize, ma_type: MaType, size: f64) -> Self {
        assert!(fast_period >= 1, "fast_period must be >= 1");
        assert!(
            slow_period > fast_period,
            "slow_period must be > fast_period"
        );
        assert!(size > 0.0, "size must be > 0");

        let prefix = ma_type.prefix();
        Self {
            fast_period,
            slow_period,
            ma_type,
            size,
            fast_key: format!("{prefix}_{fast_period}"),
            slow_key: format!("{prefix}_{slow_period}"),
        }
    }

    pub fn default_params() -> Self {
        Self::new(10, 50, MaType::Sma, 10.0)
    }

    /// Build from `fast_period`, `slow_period`, `ma_type` (0 = SMA, 1 = EMA), `size`.
    pub fn from_params(params: &StrategyParams) -> Result<Self, ConfigError> {
        params.ensure_known(NAME, &["fast_period", "slow_period", "ma_type", "size"])?;
        let fast_period = params.period(NAME, "fast_period", 10)?;
        let slow_period = params.period(NAME, "slow_period", 50)?;
        if slow_period <= fast_period {
            return Err(ConfigError::InvalidParameter {
                strategy: NAME.to_string(),
                param: "slow_period".to_string(),
                reason: format!(
                    "must be greater than fast_period ({slow_period} <= {fast_period})"
                ),
            });
        }
        let ma_type = if params.flag(NAME, "ma_type", false)? {
            MaType::Ema
        } else {
            MaType::Sma
        };
        let size = params.positive(NAME, "size", 10.0)?;
        Ok(Self::new(fast_period, slow_period, ma_type, size))
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        NAME
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            self.ma_type.build(self.fast_period),
            self.ma_type.build(self.slow_period),
        ]
    }

    fn decide(
        &self,
        bar: &Bar,
        indicators: &IndicatorSnapshot,
        portfolio: &PortfolioView,
    ) -> Option<Order> {
        let fast = indicators.get(&self.fast_key)?;
        let slow = indicators.get(&self.slow_key)?;

        if portfolio.is_flat() {
            (fast > slow).then(|| Order::buy(bar.date, bar.close, self.size))
        } else {
            (fast < slow).then(|| Order::sell(bar.date, bar.close, self.size))
        }
    }
}

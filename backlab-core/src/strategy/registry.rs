//! Strategy registry: resolves a strategy name plus parameters into a
//! runtime trait object.

use std::collections::BTreeMap;

use super::{BuyAndHold, ConfigError, MaCrossover, Momentum, Strategy, StrategyParams};

/// Constructor registered under a strategy name.
pub type StrategyBuilder =
    Box<dyn Fn(&StrategyParams) -> Result<Box<dyn Strategy>, ConfigError> + Send + Sync>;

/// Name-keyed lookup of strategy constructors.
pub struct StrategyRegistry {
    builders: BTreeMap<String, StrategyBuilder>,
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            builders: BTreeMap::new(),
        }
    }

    /// Registry pre-loaded with every built-in strategy.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::momentum::NAME, |p| {
            Ok(Box::new(Momentum::from_params(p)?) as Box<dyn Strategy>)
        });
        registry.register(super::ma_crossover::NAME, |p| {
            Ok(Box::new(MaCrossover::from_params(p)?) as Box<dyn Strategy>)
        });
        registry.register(super::buy_and_hold::NAME, |p| {
            Ok(Box::new(BuyAndHold::from_params(p)?) as Box<dyn Strategy>)
        });
        registry
    }

    /// Add or replace a strategy constructor.
    pub fn register<F>(&mut self, name: impl Into<String>, builder: F)
    where
        F: Fn(&StrategyParams) -> Result<Box<dyn Strategy>, ConfigError> + Send + Sync + 'static,
    {
        self.builders.insert(name.into(), Box::new(builder));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.builders.keys().map(|k| k.as_str()).collect()
    }

    /// Build a strategy by name.
    pub fn build(
        &self,
        name: &str,
        params: &StrategyParams,
    ) -> Result<Box<dyn Strategy>, ConfigError> {
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| ConfigError::UnknownStrategy {
                name: name.to_string(),
                available: self.names().join(", "),
            })?;
        builder(params)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, Order, PortfolioView};
    use crate::indicators::{Indicator, IndicatorSnapshot};

    #[test]
    fn defaults_are_registered() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["buy_and_hold", "ma_crossover", "momentum"]
        );
    }

    #[test]
    fn build_momentum_with_params() {
        let registry = StrategyRegistry::with_defaults();
        let params = StrategyParams::new().with("sma_period", 2.0);
        let strategy = registry.build("momentum", &params).unwrap();
        assert_eq!(strategy.name(), "momentum");
        assert_eq!(strategy.warmup_bars(), 1);
    }

    #[test]
    fn unknown_strategy_lists_available() {
        let registry = StrategyRegistry::with_defaults();
        let err = registry
            .build("mean_reversion", &StrategyParams::new())
            .err().unwrap();
        match err {
            ConfigError::UnknownStrategy { name, available } => {
                assert_eq!(name, "mean_reversion");
                assert!(available.contains("momentum"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    struct AlwaysFlat;

    impl Strategy for AlwaysFlat {
        fn name(&self) -> &str {
            "always_flat"
        }

        fn indicators(&self) -> Vec<Box<dyn Indicator>> {
            Vec::new()
        }

        fn decide(&self, _: &Bar, _: &IndicatorSnapshot, _: &PortfolioView) -> Option<Order> {
            None
        }
    }

    #[test]
    fn custom_strategies_can_be_registered() {
        let mut registry = StrategyRegistry::new();
        registry.register("always_flat", |_| Ok(Box::new(AlwaysFlat) as Box<dyn Strategy>));
        assert!(registry.contains("always_flat"));
        let strategy = registry.build("always_flat", &StrategyParams::new()).unwrap();
        assert_eq!(strategy.name(), "always_flat");
    }
}

//! Strategy parameters: a flat name → number mapping with typed accessors.
//!
//! Each accessor validates the value it extracts and falls back to the
//! strategy's default when the key is absent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ConfigError;

/// Parameter mapping supplied with a backtest request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyParams(BTreeMap<String, f64>);

impl StrategyParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy in tests and presets.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject any key not in `allowed`.
    pub fn ensure_known(&self, strategy: &str, allowed: &[&str]) -> Result<(), ConfigError> {
        match self.0.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(unknown) => Err(ConfigError::UnknownParameter {
                strategy: strategy.to_string(),
                param: unknown.clone(),
            }),
            None => Ok(()),
        }
    }

    /// A window length: integral and >= 1.
    pub fn period(&self, strategy: &str, name: &str, default: usize) -> Result<usize, ConfigError> {
        let Some(value) = self.get(name) else {
            return Ok(default);
        };
        if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
            return Err(invalid(
                strategy,
                name,
                format!("expected a positive integer, got {value}"),
            ));
        }
        Ok(value as usize)
    }

    /// A strictly positive, finite quantity.
    pub fn positive(&self, strategy: &str, name: &str, default: f64) -> Result<f64, ConfigError> {
        let Some(value) = self.get(name) else {
            return Ok(default);
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(
                strategy,
                name,
                format!("expected a positive number, got {value}"),
            ));
        }
        Ok(value)
    }

    /// A 0/1 switch.
    pub fn flag(&self, strategy: &str, name: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(name) {
            None => Ok(default),
            Some(v) if v == 0.0 => Ok(false),
            Some(v) if v == 1.0 => Ok(true),
            Some(v) => Err(invalid(strategy, name, format!("expected 0 or 1, got {v}"))),
        }
    }
}

fn invalid(strategy: &str, name: &str, reason: String) -> ConfigError {
    ConfigError::InvalidParameter {
        strategy: strategy.to_string(),
        param: name.to_string(),
        reason,
    }
}

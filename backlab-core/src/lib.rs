//! BackLab Core: domain types, streaming indicators, strategies, the
//! simulation engine, and market-data providers.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, price series, orders, positions, portfolio, trade log)
//! - Causal streaming indicators (SMA, EMA)
//! - Strategies and the name-keyed strategy registry
//! - The bar-by-bar simulation loop
//! - Market data providers (CSV, Yahoo Finance, synthetic)

pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;

pub use engine::{run_backtest, BacktestError, EngineConfig, RunResult, SimulationEngine};

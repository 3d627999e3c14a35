//! Simulation engine: the bar-by-bar loop and its supporting types.
//!
//! For each bar, in order:
//! 1. Advance every indicator with the bar
//! 2. Record the pre-decision portfolio value at the bar's close
//! 3. Ask the strategy for a decision
//! 4. Apply the resulting order, if any, and append a trade record
//!
//! A run is single-threaded and deterministic. Independent runs share no
//! mutable state and may execute in parallel.

pub mod error;
pub mod loop_runner;
pub mod precompute;
pub mod state;

pub use error::{BacktestError, SimulationError};
pub use loop_runner::{run_backtest, SimulationEngine};
pub use precompute::{advance_indicators, compute_warmup};
pub use state::{EngineConfig, EngineState, RunResult};

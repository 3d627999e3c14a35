//! BackLab Runner: request handling, metrics, and batch orchestration.
//!
//! This crate builds on `backlab-core` to provide:
//! - Request defaults and validation
//! - Strategy resolution, data acquisition, and the engine run for one request
//! - Metrics over the equity curve (total return, Sharpe, max drawdown)
//! - Translation of every failure into a structured response
//! - TOML runner configuration
//! - Parallel batch runs

pub mod api;
pub mod batch;
pub mod config;
pub mod metrics;
pub mod runner;

pub use api::{BacktestRequest, BacktestResponse, ErrorKind, ErrorResponse, Response, ResponseBody};
pub use batch::{run_batch, run_batch_reports, BatchSummary};
pub use config::{ConfigFileError, DataSource, LogFormat, LoggingConfig, RunnerConfig};
pub use metrics::{Metrics, MetricsError, MetricsReport};
pub use runner::{BacktestReport, Backtester, RunError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn backtester_is_send_sync() {
        assert_send::<Backtester>();
        assert_sync::<Backtester>();
    }

    #[test]
    fn report_types_are_send_sync() {
        assert_send::<BacktestReport>();
        assert_sync::<BacktestReport>();
        assert_send::<Response>();
        assert_sync::<Response>();
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunnerConfig>();
        assert_sync::<RunnerConfig>();
        assert_send::<BacktestRequest>();
        assert_sync::<BacktestRequest>();
    }
}

//! Backtest orchestration: request in, report or structured error out.
//!
//! Order of work for one request:
//! 1. Resolve defaults and parse dates
//! 2. Build the strategy (unknown names and bad parameters fail here, before any I/O)
//! 3. Fetch bars from the market data provider
//! 4. Validate the price series
//! 5. Run the engine
//! 6. Compute metrics

use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use backlab_core::data::{MarketDataProvider, ProviderError};
use backlab_core::domain::{DataError, PriceSeries};
use backlab_core::engine::{BacktestError, SimulationEngine, SimulationError, RunResult};
use backlab_core::strategy::{ConfigError, StrategyRegistry};

use crate::api::{BacktestRequest, BacktestResponse, ErrorKind, ResolvedRequest, Response};
use crate::config::RunnerConfig;
use crate::metrics::{Metrics, MetricsError};

/// Errors from a single backtest request.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("data acquisition failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("backtest timed out after {0:?}")]
    Timeout(Duration),
}

impl From<BacktestError> for RunError {
    fn from(e: BacktestError) -> Self {
        match e {
            BacktestError::Config(e) => RunError::Config(e),
            BacktestError::Data(e) => RunError::Data(e),
            BacktestError::Simulation(e) => RunError::Simulation(e),
        }
    }
}

impl RunError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::InvalidRequest(_) | RunError::Config(_) => ErrorKind::Configuration,
            RunError::Provider(_) => ErrorKind::DataAcquisition,
            RunError::Data(_) => ErrorKind::Data,
            RunError::Simulation(_) => ErrorKind::Simulation,
            RunError::Metrics(_) => ErrorKind::Metrics,
            RunError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    pub fn into_response(self) -> Response {
        Response::error(self.kind(), self.to_string())
    }
}

/// Everything one successful run produced, at full precision.
#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub request: ResolvedRequest,
    pub metrics: Metrics,
    pub result: RunResult,
    /// BLAKE3 over the bars the run consumed.
    pub dataset_hash: String,
    pub elapsed: Duration,
}

impl BacktestReport {
    pub fn warnings(&self) -> Vec<String> {
        self.metrics
            .sharpe_error
            .iter()
            .map(|e| format!("sharpe_ratio undefined: {e}"))
            .collect()
    }

    pub fn to_response(&self) -> BacktestResponse {
        BacktestResponse {
            metrics: self.metrics.report(),
            equity_curve: self.result.equity_curve.clone(),
            trades: self.result.trades.clone(),
            final_value: self.result.final_value,
            warnings: self.warnings(),
        }
    }
}

/// Runs backtest requests against one data provider and strategy registry.
///
/// Cheap to clone; clones share the provider and registry. Each run builds
/// its own strategy and engine state, so concurrent runs never share
/// mutable state.
#[derive(Clone)]
pub struct Backtester {
    config: Arc<RunnerConfig>,
    provider: Arc<dyn MarketDataProvider>,
    registry: Arc<StrategyRegistry>,
}

impl Backtester {
    pub fn new(config: RunnerConfig, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            registry: Arc::new(StrategyRegistry::with_defaults()),
        }
    }

    /// Build with the provider the `[data]` section selects.
    pub fn from_config(config: RunnerConfig) -> Result<Self, ProviderError> {
        let provider = config.data.build_provider()?;
        Ok(Self::new(config, provider))
    }

    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn run(&self, request: &BacktestRequest) -> Result<BacktestReport, RunError> {
        let started = Instant::now();
        let request = request.resolve(&self.config.defaults)?;
        let strategy = self.registry.build(&request.strategy, &request.params)?;

        info!(
            ticker = %request.ticker,
            strategy = %request.strategy,
            start = %request.start,
            end = %request.end,
            provider = self.provider.name(),
            "running backtest"
        );

        let bars = self.provider.fetch(&request.ticker, request.start, request.end)?;
        let series = PriceSeries::new(request.ticker.clone(), bars)?;
        let result = SimulationEngine::new(self.config.engine.clone()).run(&series, strategy.as_ref())?;
        let metrics = Metrics::compute(&result.values())?;

        if let Some(e) = &metrics.sharpe_error {
            warn!(ticker = %request.ticker, reason = %e, "sharpe ratio undefined");
        }

        Ok(BacktestReport {
            dataset_hash: series.dataset_hash(),
            elapsed: started.elapsed(),
            request,
            metrics,
            result,
        })
    }

    /// Run and translate the outcome into a response. Never fails.
    pub fn handle(&self, request: &BacktestRequest) -> Response {
        match self.run(request) {
            Ok(report) => Response::ok(report.to_response()),
            Err(e) => {
                warn!(kind = ?e.kind(), error = %e, "backtest failed");
                e.into_response()
            }
        }
    }

    /// [`handle`](Self::handle) with a deadline over the whole run.
    ///
    /// On timeout the worker thread is left to finish in the background and
    /// its result is dropped.
    pub fn handle_with_timeout(&self, request: &BacktestRequest, timeout: Duration) -> Response {
        let (tx, rx) = mpsc::channel();
        let worker = self.clone();
        let request = request.clone();
        std::thread::spawn(move || {
            // The receiver is gone after a timeout; nothing left to report to.
            let _ = tx.send(worker.handle(&request));
        });

        match rx.recv_timeout(timeout) {
            Ok(response) => response,
            Err(_) => {
                let e = RunError::Timeout(timeout);
                warn!(error = %e, "backtest timed out");
                e.into_response()
            }
        }
    }
}

impl std::fmt::Debug for Backtester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backtester")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .field("strategies", &self.registry.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlab_core::data::SyntheticProvider;
    use backlab_core::domain::{Bar, OrderRejection};
    use chrono::NaiveDate;

    /// Serves a fixed close path regardless of ticker.
    struct FixedProvider(Vec<f64>);

    impl MarketDataProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch_raw(
            &self,
            _ticker: &str,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<Bar>, ProviderError> {
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(i, &close)| Bar {
                    date: start + chrono::Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 0,
                })
                .collect())
        }
    }

    fn backtester(closes: &[f64]) -> Backtester {
        Backtester::new(RunnerConfig::default(), Arc::new(FixedProvider(closes.to_vec())))
    }

    fn momentum(period: f64, size: f64) -> BacktestRequest {
        let mut req = BacktestRequest::default();
        req.params.insert("sma_period", period);
        req.params.insert("size", size);
        req
    }

    #[test]
    fn run_produces_report() {
        let report = backtester(&[10.0, 12.0, 9.0]).run(&momentum(2.0, 1.0)).unwrap();
        assert_eq!(report.result.values(), vec![10_000.0, 10_000.0, 9_997.0]);
        assert_eq!(report.result.trades.len(), 2);
        assert!((report.metrics.total_return - (-0.0003)).abs() < 1e-12);
        assert_eq!(report.request.ticker, "AAPL");
        assert_eq!(report.dataset_hash.len(), 64);
    }

    #[test]
    fn unknown_strategy_is_400() {
        let req = BacktestRequest {
            strategy: Some("mean_reversion".into()),
            ..Default::default()
        };
        let resp = backtester(&[1.0, 2.0]).handle(&req);
        assert_eq!(resp.status, 400);
        let json = resp.to_json();
        assert_eq!(json["kind"], "configuration");
        assert!(json["error"].as_str().unwrap().contains("unknown strategy"));
    }

    #[test]
    fn too_short_series_is_422() {
        let resp = backtester(&[1.0, 2.0, 3.0]).handle(&BacktestRequest::default());
        assert_eq!(resp.status, 422);
    }

    #[test]
    fn provider_failure_is_502() {
        let resp = backtester(&[]).handle(&BacktestRequest::default());
        assert_eq!(resp.status, 502);
        assert_eq!(resp.to_json()["kind"], "data_acquisition");
    }

    #[test]
    fn unknown_param_fails_before_fetch() {
        let mut req = BacktestRequest::default();
        req.params.insert("lookback", 3.0);
        // An empty provider would give 502 if it were ever reached.
        let err = backtester(&[]).run(&req).unwrap_err();
        assert!(matches!(err, RunError::Config(ConfigError::UnknownParameter { .. })));
    }

    #[test]
    fn flat_equity_reports_null_sharpe_with_warning() {
        let resp = backtester(&[5.0; 30]).handle(&BacktestRequest::default());
        assert!(resp.is_success());
        let json = resp.to_json();
        assert!(json["metrics"]["sharpe_ratio"].is_null());
        assert_eq!(json["metrics"]["total_return"], 0.0);
        assert_eq!(json["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn simulation_error_maps_to_500() {
        let err = RunError::from(BacktestError::Simulation(SimulationError {
            bar_index: 3,
            date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            reason: OrderRejection::InvalidOrder("size must be finite and positive, got 0".into()),
            partial_equity: Vec::new(),
        }));
        assert_eq!(err.into_response().status, 500);
    }

    #[test]
    fn timeout_wraps_whole_run() {
        let tester = Backtester::new(RunnerConfig::default(), Arc::new(SyntheticProvider::default()));
        let resp = tester.handle_with_timeout(&BacktestRequest::default(), Duration::from_secs(30));
        assert!(resp.is_success());

        let resp = tester.handle_with_timeout(&BacktestRequest::default(), Duration::ZERO);
        // Either the run beat a zero deadline or it timed out; never anything else.
        assert!(resp.status == 200 || resp.status == 504);
    }
}

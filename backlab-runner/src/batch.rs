//! Parallel batch runs.
//!
//! Independent requests run on the rayon pool, one isolated engine per
//! request. Results come back in input order.

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::api::{BacktestRequest, Response};
use crate::runner::{BacktestReport, Backtester, RunError};

/// Run every request and keep full-precision reports.
pub fn run_batch_reports(
    backtester: &Backtester,
    requests: &[BacktestRequest],
) -> Vec<Result<BacktestReport, RunError>> {
    requests.par_iter().map(|req| backtester.run(req)).collect()
}

/// Run every request and translate each outcome into a response.
pub fn run_batch(backtester: &Backtester, requests: &[BacktestRequest]) -> Vec<Response> {
    let responses: Vec<Response> = requests.par_iter().map(|req| backtester.handle(req)).collect();
    let summary = BatchSummary::from_responses(&responses);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch complete"
    );
    responses
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_responses(responses: &[Response]) -> Self {
        let succeeded = responses.iter().filter(|r| r.is_success()).count();
        Self {
            total: responses.len(),
            succeeded,
            failed: responses.len() - succeeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use backlab_core::data::SyntheticProvider;

    use crate::config::RunnerConfig;

    fn backtester() -> Backtester {
        Backtester::new(RunnerConfig::default(), Arc::new(SyntheticProvider::default()))
    }

    #[test]
    fn batch_matches_sequential_and_keeps_order() {
        let tester = backtester();
        let requests: Vec<BacktestRequest> = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"]
            .iter()
            .map(|t| BacktestRequest::for_ticker(*t))
            .collect();

        let parallel = run_batch(&tester, &requests);
        let sequential: Vec<Response> = requests.iter().map(|r| tester.handle(r)).collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn failures_do_not_poison_the_batch() {
        let tester = backtester();
        let requests = vec![
            BacktestRequest::for_ticker("AAA"),
            BacktestRequest {
                strategy: Some("nope".into()),
                ..Default::default()
            },
            BacktestRequest::for_ticker("BBB"),
        ];
        let responses = run_batch(&tester, &requests);
        let statuses: Vec<u16> = responses.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![200, 400, 200]);
        assert_eq!(
            BatchSummary::from_responses(&responses),
            BatchSummary {
                total: 3,
                succeeded: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn reports_keep_full_precision() {
        let tester = backtester();
        let reports = run_batch_reports(&tester, &[BacktestRequest::for_ticker("AAA")]);
        let report = reports[0].as_ref().unwrap();
        assert_eq!(report.result.equity_curve.len(), 260);
    }
}

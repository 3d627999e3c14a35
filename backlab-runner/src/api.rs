//! Request and response types at the service boundary.
//!
//! A request names a ticker, date range, strategy, and parameters; any field
//! left out takes the configured default. A response is either the full
//! result or a structured error, each paired with an HTTP-style status code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use backlab_core::domain::{EquityPoint, TradeRecord};
use backlab_core::strategy::StrategyParams;

use crate::config::RequestDefaults;
use crate::metrics::MetricsReport;
use crate::runner::RunError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestRequest {
    pub ticker: Option<String>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub end_date: Option<String>,
    pub strategy: Option<String>,
    pub params: StrategyParams,
}

/// A request with every default applied and every date parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub strategy: String,
    pub params: StrategyParams,
}

impl BacktestRequest {
    pub fn for_ticker(ticker: impl Into<String>) -> Self {
        Self {
            ticker: Some(ticker.into()),
            ..Default::default()
        }
    }

    pub fn resolve(&self, defaults: &RequestDefaults) -> Result<ResolvedRequest, RunError> {
        let ticker = self
            .ticker
            .as_deref()
            .map(str::trim)
            .unwrap_or(&defaults.ticker)
            .to_string();
        if ticker.is_empty() {
            return Err(RunError::InvalidRequest("ticker must not be empty".into()));
        }

        let start = parse_date("start_date", self.start_date.as_deref(), defaults.start_date)?;
        let end = parse_date("end_date", self.end_date.as_deref(), defaults.end_date)?;
        if start > end {
            return Err(RunError::InvalidRequest(format!(
                "start_date {start} is after end_date {end}"
            )));
        }

        Ok(ResolvedRequest {
            ticker,
            start,
            end,
            strategy: self
                .strategy
                .clone()
                .unwrap_or_else(|| defaults.strategy.clone()),
            params: self.params.clone(),
        })
    }
}

fn parse_date(field: &str, value: Option<&str>, default: NaiveDate) -> Result<NaiveDate, RunError> {
    match value {
        None => Ok(default),
        Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| {
            RunError::InvalidRequest(format!("{field} '{s}' is not a YYYY-MM-DD date: {e}"))
        }),
    }
}

// ─── Responses ──────────────────────────────────────────────────────

/// Failure category, which fixes the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Data,
    DataAcquisition,
    Simulation,
    Metrics,
    Timeout,
}

impl ErrorKind {
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Configuration => 400,
            ErrorKind::Data => 422,
            ErrorKind::DataAcquisition => 502,
            ErrorKind::Simulation | ErrorKind::Metrics => 500,
            ErrorKind::Timeout => 504,
        }
    }
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResponse {
    pub metrics: MetricsReport,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<TradeRecord>,
    pub final_value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success(Box<BacktestResponse>),
    Failure(ErrorResponse),
}

/// Status code plus body, ready to hand to any transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: ResponseBody,
}

impl Response {
    pub fn ok(body: BacktestResponse) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Success(Box::new(body)),
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: kind.status_code(),
            body: ResponseBody::Failure(ErrorResponse {
                error: message.into(),
                kind,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Both bodies are plain structs of numbers and strings.
        serde_json::to_value(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

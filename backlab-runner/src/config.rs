//! Runner configuration, loaded from TOML.
//!
//! Every section and field is optional; an empty file yields the defaults.
//!
//! ```toml
//! [engine]
//! initial_cash = 10000.0
//! allow_short = false
//!
//! [data]
//! source = "csv"          # yahoo | csv | synthetic
//! csv_dir = "data"
//! timeout_secs = 30
//! # yahoo_base_url = "http://localhost:8080/v8/finance/chart"
//!
//! [defaults]
//! ticker = "AAPL"
//! start_date = "2022-01-01"
//! end_date = "2023-01-01"
//! strategy = "momentum"
//!
//! [logging]
//! level = "info"
//! format = "pretty"       # pretty | json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use backlab_core::data::{
    CircuitBreaker, CsvProvider, MarketDataProvider, ProviderError, SyntheticProvider,
    YahooProvider,
};
use backlab_core::engine::EngineConfig;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub engine: EngineConfig,
    pub data: DataConfig,
    pub defaults: RequestDefaults,
    pub logging: LoggingConfig,
}

impl RunnerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ─── Data ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: DataSource,
    /// Directory holding `<TICKER>.csv` files for the csv source.
    pub csv_dir: PathBuf,
    /// Per-HTTP-request timeout for the yahoo source.
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Alternate chart endpoint for the yahoo source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yahoo_base_url: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Yahoo,
            csv_dir: PathBuf::from("data"),
            timeout_secs: 30,
            max_retries: 3,
            yahoo_base_url: None,
        }
    }
}

impl DataConfig {
    /// Construct the provider this section selects.
    pub fn build_provider(&self) -> Result<Arc<dyn MarketDataProvider>, ProviderError> {
        Ok(match self.source {
            DataSource::Yahoo => {
                let retry = backlab_core::data::yahoo::RetryPolicy {
                    max_retries: self.max_retries,
                    ..Default::default()
                };
                let mut provider = YahooProvider::new(
                    Duration::from_secs(self.timeout_secs),
                    Arc::new(CircuitBreaker::default()),
                )?
                .with_retry(retry);
                if let Some(base_url) = &self.yahoo_base_url {
                    provider = provider.with_base_url(base_url.clone());
                }
                Arc::new(provider)
            }
            DataSource::Csv => Arc::new(CsvProvider::new(&self.csv_dir)),
            DataSource::Synthetic => Arc::new(SyntheticProvider::default()),
        })
    }
}

// ─── Request defaults ───────────────────────────────────────────────

/// Values used for any field a request leaves out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub strategy: String,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            ticker: "AAPL".to_string(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            strategy: "momentum".to_string(),
        }
    }
}

// ─── Logging ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `backlab_core=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

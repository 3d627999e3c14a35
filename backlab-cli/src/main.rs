//! BackLab CLI: run single-ticker backtests and print the JSON response.
//!
//! Commands:
//! - `run`: one backtest; request fields fall back to the config defaults
//! - `batch`: many backtests in parallel from a JSON array of requests
//! - `strategies`: list registered strategy names

mod obs;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use backlab_core::strategy::StrategyRegistry;
use backlab_runner::config::DataSource;
use backlab_runner::{run_batch, BacktestRequest, Backtester, BatchSummary, Response, RunnerConfig};

#[derive(Parser)]
#[command(name = "backlab", about = "BackLab CLI: single-asset strategy backtester")]
struct Cli {
    /// Path to a TOML runner config. Every section is optional.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the `[data] source` setting.
    #[arg(long, global = true, value_enum)]
    source: Option<SourceArg>,

    /// Override the `[data] csv_dir` setting.
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Yahoo,
    Csv,
    Synthetic,
}

impl From<SourceArg> for DataSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Yahoo => DataSource::Yahoo,
            SourceArg::Csv => DataSource::Csv,
            SourceArg::Synthetic => DataSource::Synthetic,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one backtest and print the response.
    Run {
        /// Ticker symbol. Defaults to `[defaults] ticker`.
        #[arg(long)]
        ticker: Option<String>,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: Option<String>,

        /// Strategy name (see `backlab strategies`).
        #[arg(long)]
        strategy: Option<String>,

        /// Strategy parameter as NAME=VALUE; repeatable.
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,

        /// Abort the whole run after this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Run a JSON array of requests in parallel and print the responses in order.
    Batch {
        /// File holding `[{"ticker": ..., "strategy": ..., "params": {...}}, ...]`.
        #[arg(long)]
        requests: PathBuf,
    },
    /// List registered strategies.
    Strategies,
}

fn parse_param(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("parameter '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn load_config(cli: &Cli) -> Result<RunnerConfig> {
    let mut config = match &cli.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    if let Some(source) = cli.source {
        config.data.source = source.into();
    }
    if let Some(dir) = &cli.csv_dir {
        config.data.csv_dir = dir.clone();
    }
    Ok(config)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    obs::init_tracing(&config.logging)?;
    tracing::debug!(source = ?config.data.source, "configuration loaded");

    match &cli.command {
        Commands::Run {
            ticker,
            start,
            end,
            strategy,
            params,
            timeout_secs,
        } => {
            let mut request = BacktestRequest {
                ticker: ticker.clone(),
                start_date: start.clone(),
                end_date: end.clone(),
                strategy: strategy.clone(),
                ..Default::default()
            };
            for (name, value) in params {
                request.params.insert(name.clone(), *value);
            }
            run_one(config, &request, timeout_secs.map(Duration::from_secs), cli.pretty)
        }
        Commands::Batch { requests } => run_many(config, requests, cli.pretty),
        Commands::Strategies => {
            for name in StrategyRegistry::with_defaults().names() {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_one(
    config: RunnerConfig,
    request: &BacktestRequest,
    timeout: Option<Duration>,
    pretty: bool,
) -> Result<ExitCode> {
    let backtester = Backtester::from_config(config).context("failed to set up data provider")?;
    let response = match timeout {
        Some(t) => backtester.handle_with_timeout(request, t),
        None => backtester.handle(request),
    };
    print_json(&json!({"status": response.status, "body": response.to_json()}), pretty)?;
    Ok(exit_code(&response))
}

fn run_many(config: RunnerConfig, path: &Path, pretty: bool) -> Result<ExitCode> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let requests: Vec<BacktestRequest> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of requests", path.display()))?;

    let backtester = Backtester::from_config(config).context("failed to set up data provider")?;
    let responses = run_batch(&backtester, &requests);
    let summary = BatchSummary::from_responses(&responses);

    let results: Vec<_> = responses
        .iter()
        .map(|r| json!({"status": r.status, "body": r.to_json()}))
        .collect();
    print_json(&json!({"summary": summary, "results": results}), pretty)?;

    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| anyhow!("failed to encode response: {e}"))?;
    println!("{text}");
    Ok(())
}

fn exit_code(response: &Response) -> ExitCode {
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

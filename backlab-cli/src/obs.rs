//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout carries only the JSON response.
//! `BACKLAB_LOG` overrides the configured filter.

use anyhow::{anyhow, Result};
use backlab_runner::{LogFormat, LoggingConfig};

pub const LOG_ENV: &str = "BACKLAB_LOG";

pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| config.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .map_err(|err| anyhow!("invalid log filter '{filter}': {err}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
    Ok(())
}

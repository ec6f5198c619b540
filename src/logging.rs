//! Tracing subscriber setup for the binaries

use crate::config::LoggingConfig;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// A set `RUST_LOG` wins; otherwise the crate logs at `config.level`.
/// Logs go to stderr so stdout stays free for previews and verdicts.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }

    Ok(())
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| default_filter(level))
}

fn default_filter(level: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::try_new(format!("fraudshield={}", level))?)
}

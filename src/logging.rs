use std::io::IsTerminal;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `sysglance=debug`.
pub const LOG_ENV: &str = "SYSGLANCE_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

pub fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Logs go to stderr so stdout carries only the report.
pub fn init() -> Result<()> {
    let directive = std::env::var(LOG_ENV).ok();
    let stderr = std::io::stderr();

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directive.as_deref()))
        .with_ansi(stderr.is_terminal())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

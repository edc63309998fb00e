//! Logging setup
//!
//! Logs go to stderr so stdout carries only the capability output.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "capscan_core=info,capscan_infra_system=info,capscan_cli=info";
const VERBOSE_FILTER: &str = "capscan_core=debug,capscan_infra_system=debug,capscan_cli=debug";

/// Initialize tracing
///
/// # Environment Variables
///
/// - `RUST_LOG`: overrides the filter entirely
/// - `CAPSCAN_LOG_FORMAT`: `json` for structured logs, anything else for pretty output
pub fn init_logging(verbose: bool) -> Result<()> {
    let log_format = std::env::var("CAPSCAN_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}

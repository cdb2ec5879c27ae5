use std::time::Duration;

use cloudcmd_domain::{LogFormat, LoggingConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. Output always goes to stderr;
/// stdout is reserved for command responses.
///
/// # Errors
/// When the configured level is not a valid filter directive, or a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.with_target(false).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` is the space-separated command path; it never carries option
/// values.
#[inline]
pub fn log_command_execution(command: &str, status: u16, elapsed: Duration) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if (200..300).contains(&status) {
        info!(command, status, duration_ms, "command_execution_success");
    } else {
        warn!(command, status, duration_ms, "command_execution_failure");
    }
}

/// Stable label for a response status, suitable for logs and exit reporting
#[inline]
pub const fn status_label(status: u16) -> &'static str {
    match status {
        200..=299 => "success",
        400 => "invalid_input",
        401 => "unauthenticated",
        403 => "forbidden",
        404 => "not_found",
        503 => "unavailable",
        _ => "internal",
    }
}

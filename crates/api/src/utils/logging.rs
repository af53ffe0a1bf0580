use std::time::Duration;

use axum::http::StatusCode;
use studysync_domain::{LogFormat, LoggingConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `logging.filter` when set.
///
/// # Errors
/// Fails if the filter does not parse or a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| anyhow::anyhow!("invalid log filter {:?}: {e}", config.filter))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

/// Log the outcome of a handled request with structured fields.
///
/// `route` is the matched route template, never the raw path.
#[inline]
pub fn log_request(method: &str, route: &str, status: StatusCode, elapsed: Duration) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    let status = status.as_u16();

    if status >= 500 {
        warn!(method, route, status, duration_ms, "request_failed");
    } else {
        info!(method, route, status, duration_ms, "request_handled");
    }
}

//! Process-wide tracing setup.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::ServerError;

/// Env var selecting the log line format (`text` or `json`).
pub const LOG_FORMAT_ENV: &str = "TICKERLENS_LOG_FORMAT";

/// Install the global subscriber. `RUST_LOG` drives the filter (default `info`).
pub fn init_tracing() -> Result<(), ServerError> {
    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };

    result.map_err(|e| ServerError::Telemetry(e.to_string()))
}

//! Tracing/logging initialization.

use std::env;
use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`); `STOREFRONT_LOG_FORMAT=json`
/// switches to JSON lines. Logs go to stderr so stdout stays machine-readable.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("STOREFRONT_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

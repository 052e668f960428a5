//! Optional tracing setup for the CLI.
//!
//! The core never logs on the success path; `debug!` spans annotate the
//! pipeline and are only visible when the `telemetry` feature is enabled
//! and a subscriber is installed.

#[cfg(feature = "telemetry")]
use std::sync::OnceLock;

/// Initialize the tracing subscriber once per process.
#[cfg(feature = "telemetry")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("whiff=info"));
        let _ = fmt().with_env_filter(filter).try_init();
    });
}

#[cfg(not(feature = "telemetry"))]
pub fn init_tracing() {}

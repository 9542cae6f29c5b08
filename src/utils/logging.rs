// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the tracing subscriber for the process.
/// Filter directives come from `RUST_LOG`; "info" when unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).init();

    tracing::debug!("Logging setup complete.");
}

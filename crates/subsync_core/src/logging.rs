//! Tracing setup helpers.
//!
//! Components in this crate only emit `tracing` events; installing a
//! subscriber is the host application's job. These helpers cover the common
//! cases.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize a global tracing subscriber for application-wide logging.
///
/// Respects `RUST_LOG`, falling back to the provided default directive.
/// Should be called once at startup.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Initialize tracing for tests (warnings and above, test writer).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

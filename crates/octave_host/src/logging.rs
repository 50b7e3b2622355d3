//! Tracing setup for host-side runs and tests
//!
//! On Android the platform crate routes logs through `android_logger`
//! instead; this is for everything else.

use tracing_subscriber::EnvFilter;

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install a formatting subscriber filtered by `RUST_LOG`, or `default_filter`
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Like [`init_tracing`], but writes through the test harness so output is
/// captured per test
pub fn init_test_tracing(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}

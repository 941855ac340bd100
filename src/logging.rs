//! Tracing initialization for binaries and tests

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber, filtered by `RUST_LOG`
///
/// Safe to call more than once; later calls are no-ops. Intended for test
/// harnesses and demo binaries - libraries embedding this crate install
/// their own subscriber.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

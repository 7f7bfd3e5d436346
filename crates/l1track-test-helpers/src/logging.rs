//! Tracing output for tests.

use tracing_subscriber::EnvFilter;

/// Install a subscriber that writes through the test harness.
///
/// `RUST_LOG` overrides the default filter, which shows debug output from
/// the workspace crates. Safe to call from every test; only the first call
/// installs anything.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("l1track_stubs=debug,l1track_bend_encoding=debug,l1track_config=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok(); // Already initialized by another test
}

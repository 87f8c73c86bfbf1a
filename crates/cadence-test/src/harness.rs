//! Test harness helpers.

use cadence_telemetry::prelude::*;

/// Set up test logging with the given filter.
///
/// Output goes to the libtest capture buffer. Safe to call from every test:
/// only the first call in a test binary installs the subscriber.
///
/// # Example
///
/// ```rust,ignore
/// use cadence_test::init_test_logging;
///
/// #[tokio::test]
/// async fn my_test() {
///     init_test_logging("cadence_events=trace");
///     // ... test code
/// }
/// ```
pub fn init_test_logging(filter: &str) {
    let config = LogConfig::new(filter)
        .with_format(LogFormat::Compact)
        .with_target(LogTarget::Test)
        .without_ansi();

    if let Err(e) = setup_logging(&config) {
        tracing::trace!(error = %e, "Test logging already initialized");
    }
}

/// Set up test logging with the default filter (warn level).
pub fn init_test_logging_default() {
    init_test_logging("warn");
}

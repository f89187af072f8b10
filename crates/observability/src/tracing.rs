//! Tracing/logging initialization.
//!
//! Filtering comes from `RUST_LOG` and falls back to `info`. The ledger engine
//! emits spans per mutation and `debug` events for written entries, so
//! `RUST_LOG=stockledger_infra=debug` shows every write.

use tracing_subscriber::EnvFilter;

/// Output format of the process-wide subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines with timestamps.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
    /// Compact output captured by the test harness.
    Test,
}

/// Install the global subscriber. Only the first call wins.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // `try_init` fails once a subscriber is set; that is the no-op path.
    let _ = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Test => builder.compact().with_test_writer().try_init(),
    };
}

//! Sets up the global `tracing` subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a pretty logger that writes to stderr, keeping stdout free for output.
///
/// The level is read from the `RUST_LOG` environment variable and falls back
/// to `default_directive` (e.g. "info" or "finance_summary=debug") if it is
/// unset or invalid. Calling this more than once has no effect.
pub fn setup_logging(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    if let Err(error) = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_log)
        .try_init()
    {
        tracing::debug!("Logging was already set up: {error}");
    }
}

//! `tracing` subscriber setup for hosts.
//!
//! The engine only emits events through `tracing`; installing a subscriber
//! is the host's call. [`init_tracing`] installs the standard formatter with
//! an [`EnvFilter`] and is safe to call more than once.

use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber.
///
/// `filter` takes precedence; otherwise `RUST_LOG` is used, falling back to
/// `info`. Returns `false` if a global subscriber was already installed.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

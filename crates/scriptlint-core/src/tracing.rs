//! Tracing setup for binaries and servers embedding the engine.
//!
//! Library code only emits events; installing a subscriber is left to the
//! surface that owns the process.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV_VAR: &str = "SCRIPTLINT_LOG";

/// Filter used when `SCRIPTLINT_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "scriptlint=info";

/// Install a global fmt subscriber filtered by `SCRIPTLINT_LOG`.
///
/// Returns false if a global subscriber was already installed; calling this
/// more than once is harmless.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

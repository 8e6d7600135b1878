//! Log output for binaries and demos.
//!
//! The library only emits `tracing` events. Installing a subscriber is left to
//! the application, which can call [`init_tracing`] once at startup.

use tracing_subscriber::EnvFilter;

/// Installs a formatted stderr subscriber filtered by `RUST_LOG`.
///
/// `default_directive` applies when `RUST_LOG` is unset or unparseable, for
/// example `"info,movie_intake=debug"`. Returns `false` if a global subscriber
/// was already installed, so repeated calls are harmless.
pub fn init_tracing(default_directive: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

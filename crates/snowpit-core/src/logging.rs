#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! All crates log through `tracing`. Hosts that want output install a
//! subscriber; with the `tracing-json` feature [`init`] installs a JSON
//! formatter filtered by `SNOWPIT_LOG` (falling back to `RUST_LOG`, then
//! `info`).

/// Environment variable consulted for the log filter.
pub const LOG_ENV_VAR: &str = "SNOWPIT_LOG";

#[cfg(feature = "tracing-json")]
fn env_filter() -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(true)
        .try_init()
        .is_ok()
}

/// Install a human-readable subscriber, for native tools and tests.
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn init_pretty() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
        .is_ok()
}

//! Diagnostic logging setup.
//!
//! Progress lines meant for the operator go to stdout with `println!`;
//! everything emitted through `tracing` goes to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `ght=debug`.
pub const LOG_ENV: &str = "GHT_LOG";

/// Default directive for a given `-v` count.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the global subscriber. `GHT_LOG` overrides the verbosity flag.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

//! Logging configuration for askdb.
//!
//! Logs always go to stderr so stdout carries only the rendered answer, which
//! keeps `askdb ask ... --format json | jq` usable.

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging.
///
/// `RUST_LOG` wins when set. Otherwise the level comes from the number of
/// `-v` flags: none is `warn`, one is `info`, two or more is `debug`.
pub fn init_stderr_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Maps the `-v` count to a filter directive.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

//! Diagnostic logging on stderr.
//!
//! stdout carries the report and plots, so log lines never go there.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Default filter for a `-v` count when `RUST_LOG` is unset.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    // Already initialised (tests, embedding) is fine.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

//! Diagnostic logging to stderr. Stdout is reserved for reports.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter directive for a `-v` count. `RUST_LOG` takes precedence when set.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn build_env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber. A second call leaves the first subscriber in place.
pub fn init(verbose: u8) {
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let installed = tracing_subscriber::registry()
        .with(build_env_filter(verbose))
        .with(layer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

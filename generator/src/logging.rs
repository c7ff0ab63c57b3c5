//! Diagnostic logging for the CLI.
//!
//! Events go to stderr so stdout only carries the progress lines. The filter
//! is read from `WICHTEL_LOG` (same syntax as `RUST_LOG`) and defaults to
//! `warn`.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "WICHTEL_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

pub fn init_logging() {
    let filter = build_filter(std::env::var(LOG_ENV_VAR).ok().as_deref());

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn build_filter(directive: Option<&str>) -> EnvFilter {
    match directive.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|err| {
            eprintln!("ignoring invalid {LOG_ENV_VAR}=`{directive}`: {err}");
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }),
        None => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

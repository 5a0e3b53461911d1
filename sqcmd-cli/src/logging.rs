//! Logging setup for the CLI.
//!
//! Engine diagnostics are emitted through `tracing` and written to stderr,
//! keeping stdout for command output.
//!
//! # Environment Variables
//!
//! - `SQCMD_LOG=<filter>` - `EnvFilter` directives (e.g. `debug`,
//!   `sqcmd_migrate=trace`); defaults to `warn`
//!
//! `--verbose` raises the default level to `debug`.

use std::env;
use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SQCMD_LOG";

static INIT: Once = Once::new();

/// Get the filter directives to use.
pub fn filter_directives(verbose: bool) -> String {
    match env::var(LOG_ENV) {
        Ok(filter) if !filter.trim().is_empty() => filter,
        _ if verbose => "sqcmd=debug,sqcmd_cli=debug,sqcmd_migrate=debug".to_string(),
        _ => "warn".to_string(),
    }
}

/// Install the global subscriber. Subsequent calls are no-ops.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_new(filter_directives(verbose)).unwrap_or_else(|_| EnvFilter::new("warn"));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .init();

        tracing::debug!(verbose, "sqcmd logging initialized");
    });
}

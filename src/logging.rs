//! Structured logging setup for the command-line tool.
//!
//! Log lines go to stderr so they never mix with the run summary on stdout.
//! `RUST_LOG` takes precedence over the verbosity flags.

use tracing::debug;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ForensicError, Result};

/// Maps `-v` / `-q` flags to a filter directive.
pub fn level_for(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if the filter directive is invalid or a subscriber is already set.
pub fn init_logging(verbosity: u8, quiet: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_for(verbosity, quiet)))
        .map_err(|e| ForensicError::invalid_config(format!("Failed to create log filter: {e}")))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| ForensicError::invalid_config(format!("Failed to install logger: {e}")))?;

    debug!("Logging system initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0, false), "warn");
        assert_eq!(level_for(1, false), "info");
        assert_eq!(level_for(2, false), "debug");
        assert_eq!(level_for(9, false), "trace");
        assert_eq!(level_for(3, true), "error");
    }
}

//! Diagnostic logging
//!
//! Installs a `tracing-subscriber` fmt subscriber. `RUST_LOG` wins over the
//! level from the settings file. The command line logs to stderr; the
//! interactive UI owns the terminal, so it logs to a file instead.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{PaystreetError, PaystreetResult};

/// Build the filter from `RUST_LOG`, falling back to `level`
pub fn filter(level: &str) -> PaystreetResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| PaystreetError::Config(format!("Invalid log level '{}': {}", level, e))),
    }
}

/// Install the global subscriber
///
/// With `log_file` set, output is appended to that file. Calling this more
/// than once keeps the first subscriber.
pub fn init(level: &str, log_file: Option<&Path>) -> PaystreetResult<()> {
    let filter = filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| PaystreetError::Io(format!("Failed to open log file: {}", e)))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_config_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = filter("paystreet=loud").unwrap_err();
        assert!(matches!(err, PaystreetError::Config(_)));
    }

    #[test]
    fn test_valid_levels() {
        for level in ["warn", "info", "paystreet_cli=debug", "off"] {
            assert!(filter(level).is_ok(), "{}", level);
        }
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("paystreet.log");
        init("warn", Some(&path)).unwrap();
        init("warn", None).unwrap();
        assert!(path.exists());
    }
}

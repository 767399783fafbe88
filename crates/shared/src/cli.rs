//! Shared CLI functionality for Fathom components
//!
//! Common CLI options and helpers shared by the `fathom` binary and any
//! service that embeds the estimator.

use crate::error::{FathomError, Result};
use clap::Args;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Common logging options
#[derive(Args, Debug, Clone)]
pub struct LoggingOptions {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", env = "FATHOM_LOG_LEVEL")]
    pub log_level: String,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

impl LoggingOptions {
    /// Initialize logging with the configured level
    ///
    /// Log lines go to stderr so that JSON written to stdout stays
    /// machine-readable.
    pub fn init_logging(&self) -> Result<()> {
        let level = self.parse_log_level();

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber).map_err(|e| {
            FathomError::internal("Failed to set logging subscriber", Some(Box::new(e)))
        })
    }

    /// Parse the log level string into a tracing Level
    pub fn parse_log_level(&self) -> Level {
        parse_level(&self.log_level)
    }
}

/// Parse a level name, falling back to `WARN` for unknown names
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" | "warning" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::WARN,
    }
}

/// Checks whether a level name is one `parse_level` understands
pub fn is_known_level(name: &str) -> bool {
    matches!(
        name.trim().to_lowercase().as_str(),
        "error" | "warn" | "warning" | "info" | "debug" | "trace"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        let opts = LoggingOptions {
            log_level: "debug".to_string(),
        };
        assert_eq!(opts.parse_log_level(), Level::DEBUG);

        let opts = LoggingOptions {
            log_level: "ERROR".to_string(),
        };
        assert_eq!(opts.parse_log_level(), Level::ERROR);

        let opts = LoggingOptions {
            log_level: "invalid".to_string(),
        };
        assert_eq!(opts.parse_log_level(), Level::WARN);
    }

    #[test]
    fn test_is_known_level() {
        assert!(is_known_level("info"));
        assert!(is_known_level(" Trace "));
        assert!(!is_known_level("verbose"));
    }
}

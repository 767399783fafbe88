//! CLI Tests
//!
//! Tests for shared CLI options parsing.

use clap::Parser;
use fathom_shared::cli::{is_known_level, parse_level, LoggingOptions};
use tracing::Level;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    logging: LoggingOptions,
}

#[test]
fn test_parse_log_level() {
    let opts = LoggingOptions {
        log_level: "info".to_string(),
    };
    assert_eq!(opts.parse_log_level(), Level::INFO);

    assert_eq!(parse_level("TRACE"), Level::TRACE);
    assert_eq!(parse_level("warning"), Level::WARN);
    assert_eq!(parse_level(""), Level::WARN);
}

#[test]
fn test_logging_options_default() {
    let opts = LoggingOptions::default();
    assert_eq!(opts.log_level, "warn");
    assert!(is_known_level(&opts.log_level));
}

#[test]
fn test_logging_options_flatten() {
    let cli = TestCli::try_parse_from(["test", "--log-level", "debug"]).unwrap();
    assert_eq!(cli.logging.parse_log_level(), Level::DEBUG);
}

//! # Fathom Shared Library
//!
//! Shared utilities for the Fathom inference utilization tools.
//! This crate provides the error type used across all Fathom crates and
//! the CLI options every binary flattens into its argument parser.
//!
//! ## Features
//!
//! - **Error Handling**: One error enum with exit-code mapping
//! - **CLI Options**: Logging options with environment fallbacks

pub mod cli;
pub mod error;

// Re-export commonly used types for convenience
pub use cli::LoggingOptions;
pub use error::{FathomError, Result};

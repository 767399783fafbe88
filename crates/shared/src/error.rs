//! # Shared Error Handling Module
//!
//! Error handling for the Fathom estimation tools with error classification
//! and context preservation.
//!
//! ## Error Categories
//!
//! - **Configuration Errors**: Invalid environment variables or config files
//! - **Validation Errors**: Input records that break the estimator's contract
//! - **Lookup Errors**: Hardware or model presets missing from the catalog
//! - **Internal Errors**: Serialization failures and unexpected conditions
//!
//! The estimation core itself never returns these errors. Numeric edge
//! cases degrade to documented sentinel values instead; errors are raised
//! by the layers that load configuration and validate caller input.

use thiserror::Error;
use tracing::warn;

/// Result type alias for Fathom operations
pub type Result<T> = std::result::Result<T, FathomError>;

/// Error types for Fathom operations
///
/// Each variant carries enough context to produce an actionable message
/// for the user of the CLI or the service embedding the estimator.
#[derive(Error, Debug)]
pub enum FathomError {
    /// Configuration loading or validation errors
    ///
    /// Raised when environment variables, config files or catalog files
    /// cannot be read or parsed.
    ///
    /// **Recovery Strategy**: Fix configuration and rerun
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// Optional source error for additional context
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input contract violations
    ///
    /// Raised by the `validate()` methods on input records before they are
    /// handed to the estimator (non-positive latencies, zero lengths,
    /// zero device counts, negative hardware figures).
    ///
    /// **Recovery Strategy**: Correct the request; never retried
    #[error("Request validation failed: {reason}")]
    RequestValidation {
        /// Reason for validation failure
        reason: String,
        /// Optional request context, usually the offending field
        context: Option<String>,
    },

    /// Catalog lookup misses
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Kind of record that was looked up ("hardware", "model")
        kind: String,
        /// Name that was requested
        name: String,
    },

    /// Internal errors
    ///
    /// Unexpected failures such as output serialization errors.
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal failure
        message: String,
        /// Source error for debugging
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FathomError {
    /// Creates a configuration error with context
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fathom_shared::error::FathomError;
    ///
    /// let error = FathomError::configuration("Invalid framework overhead", None);
    /// ```
    pub fn configuration(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source,
        }
    }

    /// Creates a request validation error
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fathom_shared::error::FathomError;
    ///
    /// let error = FathomError::request_validation("tpot_ms must be positive", Some("tpot_ms".to_string()));
    /// ```
    pub fn request_validation(reason: impl Into<String>, context: Option<String>) -> Self {
        Self::RequestValidation {
            reason: reason.into(),
            context,
        }
    }

    /// Creates a lookup error for a missing catalog entry
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fathom_shared::error::FathomError;
    ///
    /// let error = FathomError::not_found("hardware", "NVIDIA B300");
    /// assert_eq!(error.to_string(), "hardware 'NVIDIA B300' not found");
    /// ```
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates an internal error with source context
    pub fn internal(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source,
        }
    }

    /// Maps this error to a process exit code for the CLI
    ///
    /// # Exit Code Mapping
    ///
    /// - Configuration errors: 2
    /// - Request validation: 3
    /// - Not found: 4
    /// - Internal errors: 1
    pub fn exit_code(&self) -> i32 {
        match self {
            FathomError::Configuration { .. } => 2,
            FathomError::RequestValidation { .. } => 3,
            FathomError::NotFound { .. } => 4,
            FathomError::Internal { .. } => {
                warn!("Internal error reached exit code mapping");
                1
            }
        }
    }

    /// Checks if this error was caused by user input rather than a defect
    ///
    /// User errors are reported without a backtrace-style chain; internal
    /// errors need investigation.
    pub fn is_user_error(&self) -> bool {
        match self {
            FathomError::Configuration { .. } => true,
            FathomError::RequestValidation { .. } => true,
            FathomError::NotFound { .. } => true,
            FathomError::Internal { .. } => false,
        }
    }
}

/// Conversion from I/O errors
///
/// I/O happens only while reading configuration and catalog files, so a
/// failed read is reported as a configuration problem.
impl From<std::io::Error> for FathomError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => {
                FathomError::configuration("File not found", Some(Box::new(err)))
            }
            std::io::ErrorKind::PermissionDenied => {
                FathomError::configuration("Permission denied", Some(Box::new(err)))
            }
            _ => FathomError::internal("I/O error", Some(Box::new(err))),
        }
    }
}

/// Conversion from JSON errors
///
/// Syntax and data errors come from user-supplied files; serializer
/// failures on our own types are internal.
impl From<serde_json::Error> for FathomError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            FathomError::internal("JSON serialization failed", Some(Box::new(err)))
        } else {
            FathomError::configuration(format!("Invalid JSON: {}", err), Some(Box::new(err)))
        }
    }
}

impl From<toml::de::Error> for FathomError {
    fn from(err: toml::de::Error) -> Self {
        FathomError::configuration(format!("Invalid TOML: {}", err.message()), Some(Box::new(err)))
    }
}

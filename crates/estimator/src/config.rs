//! Estimator configuration management
//!
//! ## Configuration Sources (precedence order)
//!
//! 1. Command line arguments (highest priority)
//! 2. Environment variables (`FATHOM_*`)
//! 3. Configuration file (TOML)
//! 4. Compiled defaults (lowest priority)

use crate::precision::Precision;
use fathom_shared::cli::is_known_level;
use fathom_shared::{FathomError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned, human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FathomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(FathomError::configuration(
                format!("unknown output format '{}', expected text or json", other),
                None,
            )),
        }
    }
}

/// Configuration for the estimator front ends
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Precision used when a request does not name one
    pub default_precision: Precision,
    /// Framework overhead charged by concurrency estimates (GB)
    pub framework_overhead_gb: f64,
    /// Catalog file merged over the built-in presets
    pub catalog_path: Option<PathBuf>,
    /// Output format
    pub output_format: OutputFormat,
    /// Logging level
    pub log_level: String,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            default_precision: Precision::Fp16,
            framework_overhead_gb: 2.0,
            catalog_path: None,
            output_format: OutputFormat::Text,
            log_level: "warn".to_string(),
        }
    }
}

impl EstimatorConfig {
    /// Defaults overridden by `FATHOM_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML file, then applies environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FathomError::configuration(
                format!("Failed to read config file {}", path.display()),
                Some(Box::new(e)),
            )
        })?;

        let mut config: Self = toml::from_str(&content)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(precision) = env::var("FATHOM_DEFAULT_PRECISION") {
            self.default_precision = precision.parse().map_err(|e| {
                FathomError::configuration(
                    format!("FATHOM_DEFAULT_PRECISION: {}", e),
                    Some(Box::new(e)),
                )
            })?;
        }

        if let Ok(overhead) = env::var("FATHOM_FRAMEWORK_OVERHEAD_GB") {
            self.framework_overhead_gb = overhead.trim().parse().map_err(|e| {
                FathomError::configuration(
                    format!("FATHOM_FRAMEWORK_OVERHEAD_GB must be a number, got '{}'", overhead),
                    Some(Box::new(e)),
                )
            })?;
        }

        if let Ok(path) = env::var("FATHOM_CATALOG_PATH") {
            self.catalog_path = if path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        if let Ok(format) = env::var("FATHOM_OUTPUT_FORMAT") {
            self.output_format = format.parse()?;
        }

        if let Ok(level) = env::var("FATHOM_LOG_LEVEL") {
            self.log_level = level;
        }

        debug!(config = ?self, "Environment overrides applied");
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.framework_overhead_gb.is_finite() || self.framework_overhead_gb < 0.0 {
            return Err(FathomError::configuration(
                format!(
                    "framework_overhead_gb must be a non-negative number, got {}",
                    self.framework_overhead_gb
                ),
                None,
            ));
        }

        if !is_known_level(&self.log_level) {
            return Err(FathomError::configuration(
                format!("unknown log level '{}'", self.log_level),
                None,
            ));
        }

        Ok(())
    }
}

//! Top-level command line for the `fathom` binary
//!
//! Global options pick the configuration file, catalog and output format;
//! each subcommand delegates to the matching estimator options.

use clap::{Parser, Subcommand};
use fathom_estimator::{
    ConcurrencyCliOptions, DescribeCliOptions, EstimatorConfig, MfuCliOptions, OutputFormat,
    PresetsCliOptions, RunContext,
};
use fathom_shared::{LoggingOptions, Result};
use std::path::PathBuf;
use tracing::debug;

/// Fathom - utilization and capacity estimates for LLM inference
#[derive(Parser, Debug)]
#[command(name = "fathom", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "FATHOM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog file (TOML or JSON) merged over the built-in presets
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    #[command(flatten)]
    pub logging: LoggingOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available Fathom commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate MFU, bandwidth utilization and the bottleneck
    Mfu(MfuCliOptions),

    /// Estimate how many requests fit in device memory
    Concurrency(ConcurrencyCliOptions),

    /// Describe a bottleneck type
    Describe(DescribeCliOptions),

    /// List hardware and model presets
    Presets(PresetsCliOptions),
}

impl Cli {
    /// Builds the effective configuration
    ///
    /// Flags win over `FATHOM_*` variables, which win over the config file.
    /// The log level flag only applies when it differs from its default.
    pub fn resolve_config(&self) -> Result<EstimatorConfig> {
        let mut config = match &self.config {
            Some(path) => EstimatorConfig::from_file(path)?,
            None => EstimatorConfig::from_env()?,
        };

        if let Some(path) = &self.catalog {
            config.catalog_path = Some(path.clone());
        }
        if let Some(format) = self.output {
            config.output_format = format;
        }
        if self.logging.log_level != LoggingOptions::default().log_level {
            config.log_level = self.logging.log_level.clone();
        }

        config.validate()?;
        debug!(config = ?config, "Resolved configuration");
        Ok(config)
    }

    /// Logging options for the resolved configuration
    pub fn logging_for(config: &EstimatorConfig) -> LoggingOptions {
        LoggingOptions {
            log_level: config.log_level.clone(),
        }
    }

    /// Run the selected command and return its rendered output
    pub fn execute(&self, ctx: &RunContext) -> Result<String> {
        match &self.command {
            Commands::Mfu(opts) => opts.run(ctx),
            Commands::Concurrency(opts) => opts.run(ctx),
            Commands::Describe(opts) => opts.run(ctx),
            Commands::Presets(opts) => opts.run(ctx),
        }
    }
}

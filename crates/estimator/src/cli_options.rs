//! CLI options for the estimator commands
//!
//! Each options struct resolves its hardware and model from the catalog,
//! validates the request, runs the matching estimator and returns the
//! rendered output. The unified `fathom` binary composes them as
//! subcommands.

use crate::advisor::describe;
use crate::analysis::analyze;
use crate::catalog::Catalog;
use crate::concurrency::ConcurrencyRequest;
use crate::config::{EstimatorConfig, OutputFormat};
use crate::precision::Precision;
use crate::report::{render_analysis, render_catalog, render_concurrency, PresetKind};
use crate::workload::WorkloadDescriptor;
use clap::Args;
use fathom_shared::Result;
use tracing::info;

/// Resolved configuration and presets shared by every command
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: EstimatorConfig,
    pub catalog: Catalog,
}

impl RunContext {
    /// Loads the catalog named by the configuration
    pub fn load(config: EstimatorConfig) -> Result<Self> {
        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        Ok(Self { config, catalog })
    }
}

/// Estimate MFU and bandwidth utilization for observed latencies
#[derive(Args, Debug, Clone)]
pub struct MfuCliOptions {
    /// Hardware preset name
    #[arg(long, env = "FATHOM_HARDWARE")]
    pub hardware: String,

    /// Model preset name or Hugging Face id
    #[arg(long, env = "FATHOM_MODEL")]
    pub model: String,

    /// Numeric precision (fp16, bf16, fp32); defaults to the configured precision
    #[arg(long)]
    pub precision: Option<Precision>,

    /// Time to first token in milliseconds
    #[arg(long)]
    pub first_token_ms: f64,

    /// Time per output token in milliseconds
    #[arg(long)]
    pub tpot_ms: f64,

    /// Input context length in tokens
    #[arg(long)]
    pub context_length: u64,

    /// Generated length in tokens
    #[arg(long)]
    pub generated_length: u64,

    /// Batch size
    #[arg(long, default_value_t = 1)]
    pub batch_size: u64,

    /// Number of replicated devices
    #[arg(long, default_value_t = 1)]
    pub device_count: u64,
}

impl MfuCliOptions {
    /// Builds the workload descriptor, filling the precision from config
    pub fn to_workload(&self, config: &EstimatorConfig) -> WorkloadDescriptor {
        WorkloadDescriptor::new(
            self.precision.unwrap_or(config.default_precision),
            self.first_token_ms,
            self.tpot_ms,
            self.context_length,
            self.generated_length,
        )
        .with_batch_size(self.batch_size)
        .with_device_count(self.device_count)
    }

    /// Run the analysis and render it
    pub fn run(&self, ctx: &RunContext) -> Result<String> {
        let hardware = ctx.catalog.hardware(&self.hardware)?;
        let model = ctx.catalog.model(&self.model)?;
        let workload = self.to_workload(&ctx.config);

        hardware.spec.validate()?;
        model.spec.validate()?;
        workload.validate()?;

        info!(
            hardware = %hardware.name,
            model = %model.name,
            precision = %workload.precision,
            device_count = workload.device_count,
            "Running utilization analysis"
        );

        let analysis = analyze(&hardware.spec, &model.spec, &workload);
        render_analysis(&analysis, ctx.config.output_format)
    }
}

/// Estimate the maximum number of concurrent requests
#[derive(Args, Debug, Clone)]
pub struct ConcurrencyCliOptions {
    /// Hardware preset name
    #[arg(long, env = "FATHOM_HARDWARE")]
    pub hardware: String,

    /// Model preset name or Hugging Face id
    #[arg(long, env = "FATHOM_MODEL")]
    pub model: String,

    /// Number of devices
    #[arg(long, default_value_t = 1)]
    pub device_count: u64,

    /// Context length per request in tokens
    #[arg(long)]
    pub context_length: u64,

    /// Numeric precision (fp16, bf16, fp32); defaults to the configured precision
    #[arg(long)]
    pub precision: Option<Precision>,

    /// Framework overhead in GB; defaults to the configured overhead
    #[arg(long)]
    pub framework_overhead_gb: Option<f64>,
}

impl ConcurrencyCliOptions {
    /// Builds the request, filling precision and overhead from config
    pub fn to_request(&self, config: &EstimatorConfig) -> ConcurrencyRequest {
        ConcurrencyRequest {
            device_count: self.device_count,
            context_length: self.context_length,
            precision: self.precision.unwrap_or(config.default_precision),
            framework_overhead_gb: self
                .framework_overhead_gb
                .unwrap_or(config.framework_overhead_gb),
        }
    }

    /// Run the estimate and render it
    pub fn run(&self, ctx: &RunContext) -> Result<String> {
        let hardware = ctx.catalog.hardware(&self.hardware)?;
        let model = ctx.catalog.model(&self.model)?;
        let request = self.to_request(&ctx.config);

        hardware.spec.validate()?;
        model.spec.validate()?;
        request.validate(&model.spec)?;

        info!(
            hardware = %hardware.name,
            model = %model.name,
            device_count = request.device_count,
            context_length = request.context_length,
            "Running concurrency estimate"
        );

        let result = request.estimate(&hardware.spec, &model.spec);
        render_concurrency(&result, ctx.config.output_format)
    }
}

/// Describe a bottleneck classification
#[derive(Args, Debug, Clone)]
pub struct DescribeCliOptions {
    /// Bottleneck type (compute, memory, balanced)
    pub bottleneck: String,
}

impl DescribeCliOptions {
    pub fn run(&self, ctx: &RunContext) -> Result<String> {
        let description = describe(&self.bottleneck);
        match ctx.config.output_format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(
                &serde_json::json!({ "description": description }),
            )?),
            OutputFormat::Text => Ok(format!("{}\n", description)),
        }
    }
}

/// List hardware and model presets
#[derive(Args, Debug, Clone)]
pub struct PresetsCliOptions {
    /// Which presets to list
    #[arg(value_enum, default_value_t = PresetKind::All)]
    pub kind: PresetKind,
}

impl PresetsCliOptions {
    pub fn run(&self, ctx: &RunContext) -> Result<String> {
        render_catalog(&ctx.catalog, self.kind, ctx.config.output_format)
    }
}

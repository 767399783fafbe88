//! # Fathom Estimator
//!
//! Closed-form utilization estimates for large language model inference.
//! Given a hardware record, a model architecture record and a workload,
//! the estimator derives FLOPs per phase, memory traffic, Model FLOPs
//! Utilization, bandwidth utilization and a bottleneck classification,
//! and turns the classification into optimization suggestions. A sibling
//! estimator bounds how many requests fit in device memory.
//!
//! ## Features
//!
//! - Prefill/decode FLOPs and MFU for fp16, bf16 and fp32
//! - Weight, KV cache and activation memory footprints
//! - Compute/memory/balanced classification with fixed thresholds
//! - Concurrency capacity with and without a paged KV cache
//! - Built-in hardware and model presets, extensible from TOML or JSON
//!
//! Every estimate is a pure function of its arguments. No state survives
//! between calls, so estimates can run from any number of threads.
//!
//! ## Example
//!
//! ```rust
//! use fathom_estimator::{estimate, Catalog, Precision, WorkloadDescriptor};
//!
//! let catalog = Catalog::builtin();
//! let hardware = catalog.hardware("NVIDIA A100 80GB").unwrap();
//! let model = catalog.model("Llama-2-7b").unwrap();
//! let workload = WorkloadDescriptor::new(Precision::Fp16, 50.0, 10.0, 2048, 128);
//!
//! let result = estimate(&hardware.spec, &model.spec, &workload);
//! assert_eq!(result.total_time_ms, 1330.0);
//! assert!(result.mfu > 0.0);
//! ```

pub mod advisor;
pub mod analysis;
pub mod catalog;
pub mod cli_options;
pub mod concurrency;
pub mod config;
pub mod hardware;
pub mod model;
pub mod precision;
pub mod report;
pub mod units;
pub mod utilization;
pub mod workload;

pub use advisor::{describe, suggest, HardwareContext, ModelContext, Priority, Suggestion};
pub use analysis::{analyze, Analysis};
pub use catalog::{Catalog, HardwarePreset, ModelPreset};
pub use cli_options::{
    ConcurrencyCliOptions, DescribeCliOptions, MfuCliOptions, PresetsCliOptions, RunContext,
};
pub use concurrency::{
    estimate_concurrency, ConcurrencyRequest, ConcurrencyResult, MemoryBreakdown,
    PAGED_ATTENTION_FACTOR,
};
pub use config::{EstimatorConfig, OutputFormat};
pub use hardware::HardwareSpec;
pub use model::ModelArchitectureSpec;
pub use precision::Precision;
pub use report::PresetKind;
pub use utilization::{estimate, BottleneckType, UtilizationResult};
pub use workload::WorkloadDescriptor;

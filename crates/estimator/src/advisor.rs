//! Optimization advice
//!
//! Maps a bottleneck classification, together with the MFU and bandwidth
//! figures it came from, to an ordered list of suggestions. The advisor
//! reads only the named fields of [`HardwareContext`] and [`ModelContext`].

use crate::hardware::HardwareSpec;
use crate::model::ModelArchitectureSpec;
use crate::utilization::BottleneckType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback text for bottleneck labels the advisor does not know
pub const UNKNOWN_BOTTLENECK_DESCRIPTION: &str = "Unknown bottleneck type";

/// Suggestion priority, ordered from most to least urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Act on this first; the run is far from its limits
    High,
    /// Worth doing once the high-priority items are handled
    Medium,
    /// Housekeeping or monitoring
    Low,
}

impl Priority {
    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Free-text category label
    pub category: String,
    /// How urgent the suggestion is
    pub priority: Priority,
    /// What to do
    pub suggestion: String,
    /// Expected effect
    pub impact: String,
}

impl Suggestion {
    fn new(category: &str, priority: Priority, suggestion: &str, impact: &str) -> Self {
        Self {
            category: category.to_string(),
            priority,
            suggestion: suggestion.to_string(),
            impact: impact.to_string(),
        }
    }
}

/// Hardware fields the advisor consults
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HardwareContext {
    /// Half-precision peak throughput (TFLOPS)
    pub fp16_peak_tflops: Option<f64>,
}

impl From<&HardwareSpec> for HardwareContext {
    fn from(hardware: &HardwareSpec) -> Self {
        Self {
            fp16_peak_tflops: Some(hardware.fp16_peak_tflops),
        }
    }
}

/// Model and workload fields the advisor consults
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelContext {
    /// Transformer layer count
    pub num_layers: Option<u64>,
    /// Context length of the analysed workload (tokens)
    pub context_length: Option<u64>,
}

impl ModelContext {
    /// Builds a context from a model record and the workload's context length
    pub fn from_model(model: &ModelArchitectureSpec, context_length: Option<u64>) -> Self {
        Self {
            num_layers: Some(model.num_layers),
            context_length,
        }
    }
}

/// Produces suggestions for a classified run
///
/// Always returns at least one suggestion. Balanced runs only ever get
/// low-priority entries.
pub fn suggest(
    mfu: f64,
    bandwidth_utilization: f64,
    bottleneck_type: BottleneckType,
    hardware_ctx: Option<&HardwareContext>,
    model_ctx: Option<&ModelContext>,
) -> Vec<Suggestion> {
    match bottleneck_type {
        BottleneckType::Compute => compute_suggestions(mfu, hardware_ctx, model_ctx),
        BottleneckType::Memory => memory_suggestions(bandwidth_utilization, model_ctx),
        BottleneckType::Balanced => balanced_suggestions(),
    }
}

fn compute_suggestions(
    mfu: f64,
    hardware_ctx: Option<&HardwareContext>,
    model_ctx: Option<&ModelContext>,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if mfu < 30.0 {
        suggestions.push(Suggestion::new(
            "Hardware Upgrade",
            Priority::High,
            "Move to a higher-throughput accelerator (for example H100 instead of A100)",
            "Can raise achieved throughput 2-3x",
        ));
    }

    if mfu < 50.0 {
        suggestions.push(Suggestion::new(
            "Precision Optimization",
            Priority::High,
            "Run on the Tensor Core path with FP16/BF16 instead of FP32",
            "Can improve compute performance 2-4x",
        ));
    }

    let fp16_peak = hardware_ctx.and_then(|h| h.fp16_peak_tflops).unwrap_or(0.0);
    if fp16_peak > 1000.0 {
        suggestions.push(Suggestion::new(
            "Batch Optimization",
            Priority::Medium,
            "Increase batch_size to keep the accelerator busy",
            "Higher throughput and lower cost per request",
        ));
    }

    let num_layers = model_ctx.and_then(|m| m.num_layers).unwrap_or(0);
    if num_layers > 50 {
        suggestions.push(Suggestion::new(
            "Model Optimization",
            Priority::Medium,
            "Consider distilling or pruning the model to cut compute",
            "Faster inference at comparable quality",
        ));
    }

    suggestions.push(Suggestion::new(
        "System Config",
        Priority::Low,
        "Keep CUDA, cuBLAS and cuDNN up to date",
        "Picks up the latest kernel optimizations",
    ));

    suggestions
}

fn memory_suggestions(bandwidth_utilization: f64, model_ctx: Option<&ModelContext>) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if bandwidth_utilization > 90.0 {
        suggestions.push(Suggestion::new(
            "Batch Optimization",
            Priority::High,
            "Reduce batch_size",
            "Relieves memory bandwidth pressure significantly",
        ));
        suggestions.push(Suggestion::new(
            "Hardware Upgrade",
            Priority::High,
            "Move to an accelerator with higher memory bandwidth (for example H100 instead of A100)",
            "H100 offers roughly 1.6x the bandwidth of A100",
        ));
    }

    if bandwidth_utilization > 70.0 {
        suggestions.push(Suggestion::new(
            "Model Optimization",
            Priority::Medium,
            "Quantize the model (INT8/INT4)",
            "Fewer bytes per step and better bandwidth efficiency",
        ));
        suggestions.push(Suggestion::new(
            "Config Optimization",
            Priority::Medium,
            "Enable a paged KV cache (PagedAttention)",
            "Smaller KV cache footprint and less KV traffic",
        ));
    }

    let context_length = model_ctx.and_then(|m| m.context_length).unwrap_or(0);
    if context_length > 8000 {
        suggestions.push(Suggestion::new(
            "Input Optimization",
            Priority::Medium,
            "Use sliding-window or sparse attention for long contexts",
            "Less bandwidth pressure from long contexts",
        ));
    }

    suggestions.push(Suggestion::new(
        "System Config",
        Priority::Low,
        "Enable memory pooling and pinned host memory",
        "Lower allocation overhead",
    ));

    suggestions
}

fn balanced_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new(
            "Status",
            Priority::Low,
            "The system is operating within a normal efficiency range",
            "No targeted optimization needed",
        ),
        Suggestion::new(
            "Monitoring",
            Priority::Low,
            "Keep monitoring MFU and bandwidth utilization over time",
            "Catches performance regressions early",
        ),
    ]
}

/// One-line description of a bottleneck label
///
/// Accepts any string. Labels are matched exactly, so anything other than
/// `compute`, `memory` or `balanced` maps to
/// [`UNKNOWN_BOTTLENECK_DESCRIPTION`].
pub fn describe(bottleneck_type: &str) -> &'static str {
    bottleneck_type
        .parse::<BottleneckType>()
        .map(BottleneckType::description)
        .unwrap_or(UNKNOWN_BOTTLENECK_DESCRIPTION)
}

impl BottleneckType {
    /// One-line description of this classification
    pub fn description(self) -> &'static str {
        match self {
            BottleneckType::Compute => "The system is currently limited by compute throughput",
            BottleneckType::Memory => "The system is currently limited by memory bandwidth",
            BottleneckType::Balanced => "Compute and memory access are relatively balanced",
        }
    }
}

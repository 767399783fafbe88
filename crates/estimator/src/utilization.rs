//! Utilization estimation
//!
//! Closed-form cost model for one inference request: FLOPs for the prefill
//! and decode phases, the bytes that have to move through device memory,
//! and the utilization ratios that follow from the observed latencies.
//!
//! ## Degenerate inputs
//!
//! The estimator never fails. Numerically degenerate but valid input maps
//! to fixed sentinels:
//!
//! - zero peak throughput reports an MFU of 0
//! - a non-positive total time pins actual FLOPS to peak and reports zero
//!   bandwidth and zero tokens per second
//! - zero device bandwidth reports a bandwidth utilization of 0
//!
//! MFU is not clamped. Implausibly small per-token latencies can push it
//! above 100%.

use crate::hardware::HardwareSpec;
use crate::model::ModelArchitectureSpec;
use crate::units::{round_to, MS_PER_SECOND, TERA};
use crate::workload::WorkloadDescriptor;
use fathom_shared::{FathomError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// MFU above which a run with low bandwidth use counts as compute-bound
pub const COMPUTE_BOUND_MFU: f64 = 70.0;
/// Bandwidth utilization below which a high-MFU run counts as compute-bound
pub const COMPUTE_BOUND_MAX_BANDWIDTH: f64 = 40.0;
/// MFU below which a run with high bandwidth use counts as memory-bound
pub const MEMORY_BOUND_MAX_MFU: f64 = 30.0;
/// Bandwidth utilization above which a low-MFU run counts as memory-bound
pub const MEMORY_BOUND_BANDWIDTH: f64 = 70.0;

/// Dominant limiter of a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BottleneckType {
    /// Limited by arithmetic throughput
    Compute,
    /// Limited by device memory bandwidth
    Memory,
    /// Neither limiter dominates
    Balanced,
}

impl BottleneckType {
    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            BottleneckType::Compute => "compute",
            BottleneckType::Memory => "memory",
            BottleneckType::Balanced => "balanced",
        }
    }
}

impl fmt::Display for BottleneckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the exact lowercase label
impl FromStr for BottleneckType {
    type Err = FathomError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "compute" => Ok(BottleneckType::Compute),
            "memory" => Ok(BottleneckType::Memory),
            "balanced" => Ok(BottleneckType::Balanced),
            other => Err(FathomError::request_validation(
                format!("unknown bottleneck type '{}'", other),
                Some("bottleneck_type".to_string()),
            )),
        }
    }
}

/// Output of [`estimate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationResult {
    /// Model FLOPs utilization (%)
    pub mfu: f64,
    /// Memory bandwidth utilization (%)
    pub memory_bandwidth_utilization: f64,
    /// Total FLOPs of the request in units of 1e12. A count, not a rate.
    pub theoretical_flops: f64,
    /// Achieved throughput (TFLOPS)
    pub actual_flops: f64,
    /// Peak throughput for the workload's precision and device count (TFLOPS)
    pub peak_flops: f64,
    /// Prefill FLOPs
    pub prefill_flops: f64,
    /// Decode FLOPs
    pub decode_flops: f64,
    /// KV cache size (bytes)
    pub kv_cache_bytes: f64,
    /// Model weight size (bytes)
    pub model_memory_bytes: f64,
    /// Bottleneck classification
    pub bottleneck_type: BottleneckType,
    /// Generated tokens per second across the batch
    pub tokens_per_second: f64,
    /// End-to-end request time (ms)
    pub total_time_ms: f64,
}

/// Estimates utilization of `hardware` when serving `model` under `workload`
///
/// Inputs are assumed to have passed [`WorkloadDescriptor::validate`]; the
/// function still avoids dividing by zero for degenerate values.
pub fn estimate(
    hardware: &HardwareSpec,
    model: &ModelArchitectureSpec,
    workload: &WorkloadDescriptor,
) -> UtilizationResult {
    let peak_flops = peak_tflops(hardware, workload);

    let prefill_flops = prefill_flops(model, workload.context_length);
    let decode_flops = decode_flops(model, workload.generated_length, workload.batch_size);
    let total_flops = prefill_flops + decode_flops;

    let total_time_ms = workload.total_time_ms();
    let total_time_s = total_time_ms / MS_PER_SECOND;

    let actual_flops = if total_time_s <= 0.0 {
        warn!(
            total_time_ms,
            "Non-positive total time; reporting actual FLOPS at peak"
        );
        peak_flops
    } else {
        total_flops / total_time_s / TERA
    };

    let mfu = if peak_flops > 0.0 {
        actual_flops / peak_flops * 100.0
    } else {
        warn!(precision = %workload.precision, "Peak throughput unknown; reporting MFU as 0");
        0.0
    };

    let kv_cache_bytes = kv_cache_bytes(model, workload);
    let model_memory_bytes = model_memory_bytes(model, workload.precision.bytes());

    let required_bandwidth =
        required_bandwidth_tbps(model_memory_bytes + kv_cache_bytes, total_time_ms);
    // Replicas share the traffic; each is measured against its own bandwidth.
    let per_device_bandwidth = required_bandwidth / workload.device_count.max(1) as f64;

    let memory_bandwidth_utilization = if hardware.memory_bandwidth_tbps > 0.0 {
        per_device_bandwidth / hardware.memory_bandwidth_tbps * 100.0
    } else {
        warn!("Device bandwidth unknown; reporting bandwidth utilization as 0");
        0.0
    };

    let tokens_per_second = if total_time_s > 0.0 {
        workload.generated_length as f64 * workload.batch_size as f64 / total_time_s
    } else {
        0.0
    };

    let bottleneck_type = classify_bottleneck(mfu, memory_bandwidth_utilization);

    debug!(
        prefill_flops,
        decode_flops,
        peak_flops,
        actual_flops,
        kv_cache_bytes,
        model_memory_bytes,
        required_bandwidth,
        total_time_ms,
        "Utilization estimate computed"
    );

    UtilizationResult {
        mfu: round_to(mfu, 2),
        memory_bandwidth_utilization: round_to(memory_bandwidth_utilization, 2),
        theoretical_flops: round_to(total_flops / TERA, 2),
        actual_flops: round_to(actual_flops, 2),
        peak_flops: round_to(peak_flops, 2),
        prefill_flops: round_to(prefill_flops, 0),
        decode_flops: round_to(decode_flops, 0),
        kv_cache_bytes: round_to(kv_cache_bytes, 0),
        model_memory_bytes: round_to(model_memory_bytes, 0),
        bottleneck_type,
        tokens_per_second: round_to(tokens_per_second, 2),
        total_time_ms: round_to(total_time_ms, 2),
    }
}

/// Peak throughput of all replicas at the workload's precision (TFLOPS)
pub fn peak_tflops(hardware: &HardwareSpec, workload: &WorkloadDescriptor) -> f64 {
    hardware.peak_tflops(workload.precision) * workload.device_count as f64
}

/// FLOPs to process the whole input context once
pub fn prefill_flops(model: &ModelArchitectureSpec, context_length: u64) -> f64 {
    2.0 * model.macs_per_token() * context_length as f64
}

/// FLOPs to generate `generated_length` tokens for each of `batch_size` sequences
pub fn decode_flops(model: &ModelArchitectureSpec, generated_length: u64, batch_size: u64) -> f64 {
    2.0 * model.macs_per_token() * generated_length as f64 * batch_size as f64
}

/// KV cache footprint at the end of generation (bytes)
///
/// Sized by the attention head count for every model, including
/// grouped-query models whose real cache is smaller.
pub fn kv_cache_bytes(model: &ModelArchitectureSpec, workload: &WorkloadDescriptor) -> f64 {
    let total_seq_len = workload.context_length as f64 + workload.generated_length as f64;
    let per_layer = 2.0
        * model.num_attention_heads as f64
        * model.head_dim as f64
        * total_seq_len
        * workload.precision.bytes() as f64;

    per_layer * model.num_layers as f64 * workload.batch_size as f64
}

/// Weight footprint for the given element width (bytes)
pub fn model_memory_bytes(model: &ModelArchitectureSpec, precision_bytes: u64) -> f64 {
    model.derived_parameter_count() * precision_bytes as f64
}

/// Bandwidth needed to move `total_bytes` within `total_time_ms` (TB/s)
pub fn required_bandwidth_tbps(total_bytes: f64, total_time_ms: f64) -> f64 {
    if total_time_ms <= 0.0 {
        return 0.0;
    }
    total_bytes / TERA / (total_time_ms / MS_PER_SECOND)
}

/// Classifies a run by its MFU and bandwidth utilization
///
/// The first matching rule wins. Everything between the thresholds is
/// reported as balanced.
pub fn classify_bottleneck(mfu: f64, bandwidth_utilization: f64) -> BottleneckType {
    if mfu > COMPUTE_BOUND_MFU && bandwidth_utilization < COMPUTE_BOUND_MAX_BANDWIDTH {
        BottleneckType::Compute
    } else if mfu < MEMORY_BOUND_MAX_MFU && bandwidth_utilization > MEMORY_BOUND_BANDWIDTH {
        BottleneckType::Memory
    } else {
        BottleneckType::Balanced
    }
}

//! Concurrency capacity estimation
//!
//! Divides the memory of a device group by the footprint of one request to
//! bound how many requests can be resident at once, with and without a
//! paged KV cache.

use crate::hardware::HardwareSpec;
use crate::model::ModelArchitectureSpec;
use crate::precision::Precision;
use crate::units::{round_to, GIB};
use crate::workload::at_least_one;
use fathom_shared::{FathomError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// KV cache compression credited to paged attention
pub const PAGED_ATTENTION_FACTOR: f64 = 2.3;

/// Decimal places kept in memory figures
const GB_DECIMALS: i32 = 4;

/// Per-request memory footprint (GB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryBreakdown {
    /// Model weights
    pub weight_memory_gb: f64,
    /// Serving framework overhead
    pub framework_overhead_gb: f64,
    /// KV cache of a single sequence
    pub kv_cache_memory_gb: f64,
    /// Activation estimate
    pub activation_memory_gb: f64,
    /// Sum of the above
    pub total_memory_gb: f64,
}

/// Output of [`estimate_concurrency`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyResult {
    /// Devices in the group
    pub device_count: u64,
    /// Resident requests with a contiguous KV cache
    pub max_concurrency_without_pa: u64,
    /// Resident requests with a paged KV cache
    pub max_concurrency_with_pa: u64,
    /// Footprint of one request
    pub memory_breakdown: MemoryBreakdown,
    /// Memory of the whole device group (GB)
    pub hardware_memory_gb: f64,
    /// Memory left for requests after framework overhead (GB)
    pub available_memory_gb: f64,
}

/// Parameters of a concurrency estimate, bundled for validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyRequest {
    /// Devices in the group
    pub device_count: u64,
    /// Context length per request (tokens)
    pub context_length: u64,
    /// Numeric precision
    #[serde(default)]
    pub precision: Precision,
    /// Fixed framework overhead (GB)
    pub framework_overhead_gb: f64,
}

impl ConcurrencyRequest {
    /// Checks the request against the estimator's input contract
    ///
    /// Also rejects a model whose per-request footprint would be zero,
    /// which would otherwise make capacity unbounded.
    pub fn validate(&self, model: &ModelArchitectureSpec) -> Result<()> {
        at_least_one("device_count", self.device_count)?;
        at_least_one("context_length", self.context_length)?;

        if !self.framework_overhead_gb.is_finite() || self.framework_overhead_gb < 0.0 {
            return Err(FathomError::request_validation(
                format!(
                    "framework_overhead_gb must be a non-negative number, got {}",
                    self.framework_overhead_gb
                ),
                Some("framework_overhead_gb".to_string()),
            ));
        }

        let footprint = per_request_gb(
            &request_memory(model, self.context_length, self.precision),
            self.framework_overhead_gb,
            1.0,
        );
        if footprint <= 0.0 {
            return Err(FathomError::request_validation(
                "model and framework overhead give a zero per-request footprint",
                Some("model".to_string()),
            ));
        }

        Ok(())
    }

    /// Runs [`estimate_concurrency`] with these parameters
    pub fn estimate(
        &self,
        hardware: &HardwareSpec,
        model: &ModelArchitectureSpec,
    ) -> ConcurrencyResult {
        estimate_concurrency(
            hardware,
            model,
            self.device_count,
            self.context_length,
            self.precision,
            self.framework_overhead_gb,
        )
    }
}

/// Unrounded per-request memory terms (GB)
struct RequestMemory {
    weight_gb: f64,
    kv_cache_gb: f64,
    activation_gb: f64,
}

fn request_memory(
    model: &ModelArchitectureSpec,
    context_length: u64,
    precision: Precision,
) -> RequestMemory {
    let bytes = precision.bytes() as f64;
    let layers = model.num_layers as f64;
    let context = context_length as f64;

    RequestMemory {
        weight_gb: model.params_billions * 1e9 * bytes / GIB,
        kv_cache_gb: 2.0
            * layers
            * model.num_attention_heads as f64
            * model.head_dim as f64
            * context
            * bytes
            / GIB,
        activation_gb: 2.0 * layers * context * model.hidden_size as f64 * bytes / GIB,
    }
}

fn per_request_gb(memory: &RequestMemory, framework_overhead_gb: f64, kv_factor: f64) -> f64 {
    memory.weight_gb + framework_overhead_gb + memory.kv_cache_gb / kv_factor + memory.activation_gb
}

fn capacity(available_gb: f64, per_request: f64) -> u64 {
    if per_request <= 0.0 {
        warn!(per_request, "Per-request footprint is not positive; reporting zero capacity");
        return 0;
    }
    (available_gb / per_request).floor().max(0.0) as u64
}

/// Estimates how many requests fit in the memory of `device_count` devices
///
/// Every request is charged the full model weights and the framework
/// overhead. Overhead is subtracted from the device group once.
pub fn estimate_concurrency(
    hardware: &HardwareSpec,
    model: &ModelArchitectureSpec,
    device_count: u64,
    context_length: u64,
    precision: Precision,
    framework_overhead_gb: f64,
) -> ConcurrencyResult {
    let memory = request_memory(model, context_length, precision);

    let total_per_request = per_request_gb(&memory, framework_overhead_gb, 1.0);
    let total_with_pa = per_request_gb(&memory, framework_overhead_gb, PAGED_ATTENTION_FACTOR);

    let hardware_memory_gb = hardware.memory_size_gb * device_count as f64;
    let available_memory_gb = hardware_memory_gb - framework_overhead_gb;

    let max_concurrency_without_pa = capacity(available_memory_gb, total_per_request);
    let max_concurrency_with_pa = capacity(available_memory_gb, total_with_pa);

    debug!(
        device_count,
        context_length,
        %precision,
        total_per_request,
        total_with_pa,
        available_memory_gb,
        max_concurrency_without_pa,
        max_concurrency_with_pa,
        "Concurrency estimate computed"
    );

    ConcurrencyResult {
        device_count,
        max_concurrency_without_pa,
        max_concurrency_with_pa,
        memory_breakdown: MemoryBreakdown {
            weight_memory_gb: round_to(memory.weight_gb, GB_DECIMALS),
            framework_overhead_gb: round_to(framework_overhead_gb, GB_DECIMALS),
            kv_cache_memory_gb: round_to(memory.kv_cache_gb, GB_DECIMALS),
            activation_memory_gb: round_to(memory.activation_gb, GB_DECIMALS),
            total_memory_gb: round_to(total_per_request, GB_DECIMALS),
        },
        hardware_memory_gb: round_to(hardware_memory_gb, GB_DECIMALS),
        available_memory_gb: round_to(available_memory_gb, GB_DECIMALS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_floors_at_zero() {
        assert_eq!(capacity(-5.0, 2.0), 0);
        assert_eq!(capacity(7.9, 2.0), 3);
        assert_eq!(capacity(10.0, 0.0), 0);
    }

    #[test]
    fn test_zero_footprint_rejected() {
        let request = ConcurrencyRequest {
            device_count: 1,
            context_length: 1024,
            precision: Precision::Fp16,
            framework_overhead_gb: 0.0,
        };
        let err = request.validate(&ModelArchitectureSpec::default()).unwrap_err();
        assert!(matches!(err, FathomError::RequestValidation { .. }));
    }

    #[test]
    fn test_negative_overhead_rejected() {
        let request = ConcurrencyRequest {
            device_count: 1,
            context_length: 1024,
            precision: Precision::Fp16,
            framework_overhead_gb: -1.0,
        };
        let model = ModelArchitectureSpec {
            params_billions: 1.0,
            ..Default::default()
        };
        assert!(request.validate(&model).is_err());
    }
}

//! Estimate plus advice in one call

use crate::advisor::{suggest, HardwareContext, ModelContext, Suggestion};
use crate::hardware::HardwareSpec;
use crate::model::ModelArchitectureSpec;
use crate::utilization::{estimate, UtilizationResult};
use crate::workload::WorkloadDescriptor;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Utilization estimate with its description and suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub result: UtilizationResult,
    /// Description of the bottleneck classification
    pub description: String,
    pub suggestions: Vec<Suggestion>,
}

/// Runs [`estimate`] and feeds its result to [`suggest`]
///
/// The advisor sees the hardware's half-precision peak, the model's layer
/// count and the workload's context length.
pub fn analyze(
    hardware: &HardwareSpec,
    model: &ModelArchitectureSpec,
    workload: &WorkloadDescriptor,
) -> Analysis {
    let result = estimate(hardware, model, workload);

    let hardware_ctx = HardwareContext::from(hardware);
    let model_ctx = ModelContext::from_model(model, Some(workload.context_length));
    let suggestions = suggest(
        result.mfu,
        result.memory_bandwidth_utilization,
        result.bottleneck_type,
        Some(&hardware_ctx),
        Some(&model_ctx),
    );

    info!(
        mfu = result.mfu,
        bandwidth_utilization = result.memory_bandwidth_utilization,
        bottleneck = %result.bottleneck_type,
        suggestions = suggestions.len(),
        "Analysis complete"
    );

    Analysis {
        description: result.bottleneck_type.description().to_string(),
        result,
        suggestions,
    }
}

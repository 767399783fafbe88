//! Workload descriptors for utilization estimates

use crate::precision::Precision;
use fathom_shared::{FathomError, Result};
use serde::{Deserialize, Serialize};

/// Observed or targeted serving behaviour for one estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkloadDescriptor {
    /// Numeric precision of the run
    #[serde(default)]
    pub precision: Precision,
    /// Time to first token (ms)
    pub first_token_latency_ms: f64,
    /// Time per output token (ms)
    pub tpot_ms: f64,
    /// Input context length (tokens)
    pub context_length: u64,
    /// Generated length (tokens)
    pub generated_length: u64,
    /// Concurrent sequences per step
    #[serde(default = "default_one")]
    pub batch_size: u64,
    /// Replicated devices serving the workload
    #[serde(default = "default_one")]
    pub device_count: u64,
}

fn default_one() -> u64 {
    1
}

impl WorkloadDescriptor {
    /// Creates a single-device, batch-of-one workload
    pub fn new(
        precision: Precision,
        first_token_latency_ms: f64,
        tpot_ms: f64,
        context_length: u64,
        generated_length: u64,
    ) -> Self {
        Self {
            precision,
            first_token_latency_ms,
            tpot_ms,
            context_length,
            generated_length,
            batch_size: 1,
            device_count: 1,
        }
    }

    /// Sets the batch size
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the number of replicated devices
    pub fn with_device_count(mut self, device_count: u64) -> Self {
        self.device_count = device_count;
        self
    }

    /// End-to-end request time: first token plus every decode step (ms)
    pub fn total_time_ms(&self) -> f64 {
        self.first_token_latency_ms + self.generated_length as f64 * self.tpot_ms
    }

    /// Rejects input the estimator's contract does not cover
    ///
    /// The estimator itself never fails; this is the check a request layer
    /// runs before calling it.
    pub fn validate(&self) -> Result<()> {
        positive_ms("first_token_latency_ms", self.first_token_latency_ms)?;
        positive_ms("tpot_ms", self.tpot_ms)?;
        at_least_one("context_length", self.context_length)?;
        at_least_one("generated_length", self.generated_length)?;
        at_least_one("batch_size", self.batch_size)?;
        at_least_one("device_count", self.device_count)?;
        Ok(())
    }
}

fn positive_ms(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FathomError::request_validation(
            format!("{} must be a positive number of milliseconds, got {}", field, value),
            Some(field.to_string()),
        ))
    }
}

pub(crate) fn at_least_one(field: &str, value: u64) -> Result<()> {
    if value >= 1 {
        Ok(())
    } else {
        Err(FathomError::request_validation(
            format!("{} must be at least 1", field),
            Some(field.to_string()),
        ))
    }
}

//! Hardware specification records

use crate::precision::Precision;
use fathom_shared::{FathomError, Result};
use serde::{Deserialize, Serialize};

/// Per-device accelerator figures
///
/// Zero is a legal "unknown" value for every field. The estimator degrades
/// to documented sentinels rather than dividing by it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HardwareSpec {
    /// Half-precision peak throughput (TFLOPS)
    pub fp16_peak_tflops: f64,
    /// Reduced-full precision peak throughput (TFLOPS), used for bf16 workloads
    pub bf32_peak_tflops: f64,
    /// Full-precision peak throughput (TFLOPS)
    pub fp32_peak_tflops: f64,
    /// Device memory capacity (GB)
    pub memory_size_gb: f64,
    /// Device memory bandwidth (TB/s)
    pub memory_bandwidth_tbps: f64,
}

impl HardwareSpec {
    /// Peak throughput of a single device for the given precision (TFLOPS)
    pub fn peak_tflops(&self, precision: Precision) -> f64 {
        match precision {
            Precision::Fp16 => self.fp16_peak_tflops,
            Precision::Bf16 => self.bf32_peak_tflops,
            Precision::Fp32 => self.fp32_peak_tflops,
        }
    }

    /// Checks that every figure is finite and non-negative
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("fp16_peak_tflops", self.fp16_peak_tflops),
            ("bf32_peak_tflops", self.bf32_peak_tflops),
            ("fp32_peak_tflops", self.fp32_peak_tflops),
            ("memory_size_gb", self.memory_size_gb),
            ("memory_bandwidth_tbps", self.memory_bandwidth_tbps),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(FathomError::request_validation(
                    format!("{} must be a non-negative number, got {}", name, value),
                    Some(name.to_string()),
                ));
            }
        }

        Ok(())
    }
}

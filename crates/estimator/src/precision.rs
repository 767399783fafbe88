//! Numeric precision selection
//!
//! The precision of a workload decides two things: the byte width used for
//! every precision-dependent size (weights, KV cache, activations) and which
//! hardware peak-throughput figure the workload is measured against.

use fathom_shared::{FathomError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric precision of an inference workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// IEEE half precision
    #[default]
    Fp16,
    /// bfloat16, measured against the hardware's reduced-full peak
    Bf16,
    /// IEEE single precision
    Fp32,
}

impl Precision {
    /// All supported precisions, in declaration order
    pub const ALL: [Precision; 3] = [Precision::Fp16, Precision::Bf16, Precision::Fp32];

    /// Bytes per element for this precision
    pub fn bytes(self) -> u64 {
        match self {
            Precision::Fp16 | Precision::Bf16 => 2,
            Precision::Fp32 => 4,
        }
    }

    /// Lowercase name as accepted on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Fp16 => "fp16",
            Precision::Bf16 => "bf16",
            Precision::Fp32 => "fp32",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Precision {
    type Err = FathomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fp16" => Ok(Precision::Fp16),
            "bf16" => Ok(Precision::Bf16),
            "fp32" => Ok(Precision::Fp32),
            other => Err(FathomError::request_validation(
                format!("unsupported precision '{}', expected fp16, bf16 or fp32", other),
                Some("precision".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_widths() {
        assert_eq!(Precision::Fp16.bytes(), 2);
        assert_eq!(Precision::Bf16.bytes(), 2);
        assert_eq!(Precision::Fp32.bytes(), 4);
    }

    #[test]
    fn test_parse_round_trips_display() {
        for precision in Precision::ALL {
            assert_eq!(precision.to_string().parse::<Precision>().unwrap(), precision);
        }
        assert_eq!(" BF16 ".parse::<Precision>().unwrap(), Precision::Bf16);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "int8".parse::<Precision>().unwrap_err();
        assert!(matches!(err, FathomError::RequestValidation { .. }));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Precision::Fp32).unwrap();
        assert_eq!(json, "\"fp32\"");
        let parsed: Precision = serde_json::from_str("\"bf16\"").unwrap();
        assert_eq!(parsed, Precision::Bf16);
    }
}

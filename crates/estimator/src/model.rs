//! Model architecture records

use fathom_shared::{FathomError, Result};
use serde::{Deserialize, Serialize};

/// Transformer architecture figures used by the cost model
///
/// Zero means "not applicable / unknown". None of the formulas divide by
/// these fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelArchitectureSpec {
    /// Parameter count in billions
    pub params_billions: f64,
    /// Number of transformer layers
    pub num_layers: u64,
    /// Hidden dimension
    pub hidden_size: u64,
    /// Attention head count
    pub num_attention_heads: u64,
    /// Key/value head count (smaller than the attention head count under GQA)
    pub num_key_value_heads: u64,
    /// Vocabulary size
    pub vocab_size: u64,
    /// Feed-forward intermediate dimension
    pub intermediate_size: u64,
    /// Per-head dimension
    pub head_dim: u64,
    /// Maximum position-embedding length
    pub max_position_embeddings: u64,
}

impl ModelArchitectureSpec {
    /// Multiply-accumulate count of one forward step over a single token
    ///
    /// Q/K/V/O projections, the three feed-forward matmuls and the output
    /// projection, each charged once per layer.
    pub fn macs_per_token(&self) -> f64 {
        let l = self.num_layers as f64;
        let d = self.hidden_size as f64;
        let i = self.intermediate_size as f64;
        let n = self.vocab_size as f64;

        4.0 * l * d * d + 3.0 * l * d * i + l * d * n
    }

    /// Parameter count derived from the architecture
    ///
    /// Attention and feed-forward weights per layer plus input and output
    /// embeddings. Used for weight memory in the utilization estimate.
    pub fn derived_parameter_count(&self) -> f64 {
        let l = self.num_layers as f64;
        let d = self.hidden_size as f64;
        let i = self.intermediate_size as f64;
        let n = self.vocab_size as f64;

        4.0 * l * d * d + 3.0 * l * d * i + 2.0 * n * d
    }

    /// Whether the model uses grouped-query attention
    pub fn uses_grouped_query_attention(&self) -> bool {
        self.num_key_value_heads > 0 && self.num_key_value_heads < self.num_attention_heads
    }

    /// Checks that the parameter count is finite and non-negative
    pub fn validate(&self) -> Result<()> {
        if !self.params_billions.is_finite() || self.params_billions < 0.0 {
            return Err(FathomError::request_validation(
                format!(
                    "params_billions must be a non-negative number, got {}",
                    self.params_billions
                ),
                Some("params_billions".to_string()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llama_7b() -> ModelArchitectureSpec {
        ModelArchitectureSpec {
            params_billions: 7.0,
            num_layers: 32,
            hidden_size: 4096,
            num_attention_heads: 32,
            num_key_value_heads: 32,
            vocab_size: 32000,
            intermediate_size: 11008,
            head_dim: 128,
            max_position_embeddings: 4096,
        }
    }

    #[test]
    fn test_macs_per_token() {
        // 4*32*4096^2 + 3*32*4096*11008 + 32*4096*32000
        assert_eq!(llama_7b().macs_per_token(), 10_670_309_376.0);
    }

    #[test]
    fn test_derived_parameter_count() {
        // Close to the nominal 7B; the formula ignores norms and biases
        assert_eq!(llama_7b().derived_parameter_count(), 6_738_149_376.0);
    }

    #[test]
    fn test_gqa_detection() {
        let mut model = llama_7b();
        assert!(!model.uses_grouped_query_attention());
        model.num_key_value_heads = 8;
        assert!(model.uses_grouped_query_attention());
    }

    #[test]
    fn test_validate() {
        assert!(ModelArchitectureSpec::default().validate().is_ok());
        let mut model = llama_7b();
        model.params_billions = -7.0;
        assert!(model.validate().is_err());
    }
}

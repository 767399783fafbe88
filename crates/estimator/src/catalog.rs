//! Hardware and model preset catalog
//!
//! Presets are plain fixture data. The catalog is built once (built-in
//! entries, optionally overridden by a TOML or JSON file) and handed to
//! callers by reference; the estimator itself never consults it.
//!
//! ## Example Catalog File (TOML)
//!
//! ```toml
//! [[hardware]]
//! name = "NVIDIA H200"
//! vendor = "NVIDIA"
//! fp16_peak_tflops = 1979.0
//! bf32_peak_tflops = 989.0
//! fp32_peak_tflops = 67.0
//! memory_size_gb = 141.0
//! memory_bandwidth_tbps = 4.8
//!
//! [[models]]
//! name = "Llama-3-8B"
//! huggingface_id = "meta-llama/Meta-Llama-3-8B"
//! params_billions = 8.0
//! num_layers = 32
//! hidden_size = 4096
//! num_attention_heads = 32
//! num_key_value_heads = 8
//! vocab_size = 128256
//! intermediate_size = 14336
//! head_dim = 128
//! max_position_embeddings = 8192
//! ```

use crate::hardware::HardwareSpec;
use crate::model::ModelArchitectureSpec;
use fathom_shared::{FathomError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Named hardware entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwarePreset {
    pub name: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub spec: HardwareSpec,
}

/// Named model entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPreset {
    pub name: String,
    #[serde(default)]
    pub huggingface_id: String,
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub spec: ModelArchitectureSpec,
}

fn default_model_type() -> String {
    "llama".to_string()
}

/// Collection of hardware and model presets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub hardware: Vec<HardwarePreset>,
    #[serde(default)]
    pub models: Vec<ModelPreset>,
}

impl Catalog {
    /// Catalog with the built-in presets
    pub fn builtin() -> Self {
        Self {
            hardware: vec![
                hardware_preset("NVIDIA A100 80GB", "NVIDIA", "Data center GPU, Ampere architecture", [1248.0, 624.0, 312.0, 80.0, 2.039]),
                hardware_preset("NVIDIA A100 40GB", "NVIDIA", "Data center GPU, Ampere architecture", [1248.0, 624.0, 312.0, 40.0, 1.555]),
                hardware_preset("NVIDIA H100 80GB", "NVIDIA", "Data center GPU, Hopper architecture", [4000.0, 2000.0, 1000.0, 80.0, 3.35]),
                hardware_preset("NVIDIA RTX 4090", "NVIDIA", "Consumer GPU, Ada Lovelace architecture", [1657.0, 82.0, 82.0, 24.0, 1.008]),
                hardware_preset("NVIDIA L40S", "NVIDIA", "Data center GPU, Ada Lovelace architecture", [1833.0, 366.0, 183.0, 48.0, 1.6]),
                hardware_preset("NVIDIA T4", "NVIDIA", "Inference GPU, Turing architecture", [130.0, 65.0, 65.0, 16.0, 0.3]),
            ],
            models: vec![
                model_preset("Llama-2-7b", "meta-llama/Llama-2-7b-hf", "llama", 7.0, [32, 4096, 32, 32, 32000, 11008, 128, 4096]),
                model_preset("Llama-2-13b", "meta-llama/Llama-2-13b-hf", "llama", 13.0, [40, 5120, 40, 40, 32000, 13824, 128, 4096]),
                model_preset("Llama-2-70b", "meta-llama/Llama-2-70b-hf", "llama", 70.0, [80, 8192, 64, 8, 32000, 28672, 128, 4096]),
                model_preset("Qwen-7B", "Qwen/Qwen-7B", "qwen", 7.0, [32, 4096, 32, 32, 151936, 11008, 128, 32768]),
                model_preset("Mistral-7B", "mistralai/Mistral-7B-v0.1", "mistral", 7.0, [32, 4096, 32, 8, 32000, 14336, 128, 32768]),
            ],
        }
    }

    /// Loads a catalog file; `.json` files are read as JSON, anything else as TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FathomError::configuration(
                format!("Failed to read catalog file {}", path.display()),
                Some(Box::new(e)),
            )
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let catalog: Self = if is_json {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };

        catalog.validate()?;
        debug!(
            path = %path.display(),
            hardware = catalog.hardware.len(),
            models = catalog.models.len(),
            "Catalog file loaded"
        );
        Ok(catalog)
    }

    /// Built-in presets overridden by the file at `path`, if any
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::builtin();
        if let Some(path) = path {
            catalog.merge(Self::from_file(path)?);
            info!(path = %path.display(), "Merged catalog file over built-in presets");
        }
        Ok(catalog)
    }

    /// Adds entries from `other`, replacing entries with the same name
    pub fn merge(&mut self, other: Catalog) {
        for preset in other.hardware {
            match self
                .hardware
                .iter_mut()
                .find(|existing| existing.name.eq_ignore_ascii_case(&preset.name))
            {
                Some(existing) => *existing = preset,
                None => self.hardware.push(preset),
            }
        }
        for preset in other.models {
            match self
                .models
                .iter_mut()
                .find(|existing| existing.name.eq_ignore_ascii_case(&preset.name))
            {
                Some(existing) => *existing = preset,
                None => self.models.push(preset),
            }
        }
    }

    /// Validates every entry and rejects blank names
    pub fn validate(&self) -> Result<()> {
        for preset in &self.hardware {
            check_name("hardware", &preset.name)?;
            preset.spec.validate().map_err(|e| with_entry("hardware", &preset.name, e))?;
        }
        for preset in &self.models {
            check_name("model", &preset.name)?;
            preset.spec.validate().map_err(|e| with_entry("model", &preset.name, e))?;
        }
        Ok(())
    }

    /// Looks up hardware by name, ignoring case
    pub fn hardware(&self, name: &str) -> Result<&HardwarePreset> {
        let name = name.trim();
        self.hardware
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FathomError::not_found("hardware", name))
    }

    /// Looks up a model by name or Hugging Face id, ignoring case
    pub fn model(&self, name: &str) -> Result<&ModelPreset> {
        let name = name.trim();
        self.models
            .iter()
            .find(|preset| {
                preset.name.eq_ignore_ascii_case(name)
                    || (!preset.huggingface_id.is_empty()
                        && preset.huggingface_id.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| FathomError::not_found("model", name))
    }
}

fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FathomError::configuration(
            format!("{} preset with an empty name", kind),
            None,
        ));
    }
    Ok(())
}

fn with_entry(kind: &str, name: &str, err: FathomError) -> FathomError {
    FathomError::configuration(
        format!("invalid {} preset '{}': {}", kind, name, err),
        Some(Box::new(err)),
    )
}

fn hardware_preset(name: &str, vendor: &str, description: &str, figures: [f64; 5]) -> HardwarePreset {
    let [fp16, bf32, fp32, memory_gb, bandwidth_tbps] = figures;
    HardwarePreset {
        name: name.to_string(),
        vendor: vendor.to_string(),
        description: description.to_string(),
        spec: HardwareSpec {
            fp16_peak_tflops: fp16,
            bf32_peak_tflops: bf32,
            fp32_peak_tflops: fp32,
            memory_size_gb: memory_gb,
            memory_bandwidth_tbps: bandwidth_tbps,
        },
    }
}

// Shape order: layers, hidden, heads, kv heads, vocab, intermediate, head dim, max positions
fn model_preset(
    name: &str,
    huggingface_id: &str,
    model_type: &str,
    params_billions: f64,
    shape: [u64; 8],
) -> ModelPreset {
    let [layers, hidden, heads, kv_heads, vocab, intermediate, head_dim, max_positions] = shape;
    ModelPreset {
        name: name.to_string(),
        huggingface_id: huggingface_id.to_string(),
        model_type: model_type.to_string(),
        description: String::new(),
        spec: ModelArchitectureSpec {
            params_billions,
            num_layers: layers,
            hidden_size: hidden,
            num_attention_heads: heads,
            num_key_value_heads: kv_heads,
            vocab_size: vocab,
            intermediate_size: intermediate,
            head_dim,
            max_position_embeddings: max_positions,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let catalog = Catalog::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.hardware.len(), 6);
        assert_eq!(catalog.models.len(), 5);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.hardware("nvidia a100 80gb").unwrap().spec.memory_size_gb,
            80.0
        );
        assert_eq!(catalog.model("LLAMA-2-70B").unwrap().spec.num_key_value_heads, 8);
        assert_eq!(
            catalog.model("mistralai/Mistral-7B-v0.1").unwrap().name,
            "Mistral-7B"
        );
    }

    #[test]
    fn test_lookup_miss() {
        let err = Catalog::builtin().hardware("TPU v5e").unwrap_err();
        assert!(matches!(err, FathomError::NotFound { .. }));
    }
}

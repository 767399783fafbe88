//! Rendering of estimates for terminal output

use crate::analysis::Analysis;
use crate::catalog::{Catalog, HardwarePreset, ModelPreset};
use crate::concurrency::ConcurrencyResult;
use crate::config::OutputFormat;
use fathom_shared::{FathomError, Result};
use serde::Serialize;
use std::fmt::{self, Write};

/// Which part of the catalog to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PresetKind {
    Hardware,
    Models,
    #[default]
    All,
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn to_text(write: impl FnOnce(&mut String) -> fmt::Result) -> Result<String> {
    let mut out = String::new();
    write(&mut out)
        .map_err(|e| FathomError::internal("Failed to format report", Some(Box::new(e))))?;
    Ok(out)
}

/// Renders an analysis as text or JSON
pub fn render_analysis(analysis: &Analysis, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(analysis),
        OutputFormat::Text => to_text(|out| write_analysis(out, analysis)),
    }
}

/// Renders a concurrency estimate as text or JSON
pub fn render_concurrency(result: &ConcurrencyResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Text => to_text(|out| write_concurrency(out, result)),
    }
}

/// Renders the catalog, or one half of it, as text or JSON
pub fn render_catalog(catalog: &Catalog, kind: PresetKind, format: OutputFormat) -> Result<String> {
    let show_hardware = kind != PresetKind::Models;
    let show_models = kind != PresetKind::Hardware;

    match format {
        OutputFormat::Json => {
            let listing = Catalog {
                hardware: if show_hardware { catalog.hardware.clone() } else { Vec::new() },
                models: if show_models { catalog.models.clone() } else { Vec::new() },
            };
            to_json(&listing)
        }
        OutputFormat::Text => to_text(|out| {
            if show_hardware {
                write_hardware(out, &catalog.hardware)?;
            }
            if show_models {
                write_models(out, &catalog.models)?;
            }
            Ok(())
        }),
    }
}

fn write_analysis(out: &mut String, analysis: &Analysis) -> fmt::Result {
    let r = &analysis.result;
    writeln!(out, "Bottleneck:                 {} ({})", r.bottleneck_type, analysis.description)?;
    writeln!(out, "MFU:                        {:.2} %", r.mfu)?;
    writeln!(out, "Bandwidth utilization:      {:.2} %", r.memory_bandwidth_utilization)?;
    writeln!(out, "Peak throughput:            {:.2} TFLOPS", r.peak_flops)?;
    writeln!(out, "Achieved throughput:        {:.2} TFLOPS", r.actual_flops)?;
    writeln!(out, "Total work:                 {:.2} TFLOP", r.theoretical_flops)?;
    writeln!(out, "Prefill FLOPs:              {:.0}", r.prefill_flops)?;
    writeln!(out, "Decode FLOPs:               {:.0}", r.decode_flops)?;
    writeln!(out, "KV cache:                   {:.0} bytes", r.kv_cache_bytes)?;
    writeln!(out, "Model weights:              {:.0} bytes", r.model_memory_bytes)?;
    writeln!(out, "Tokens per second:          {:.2}", r.tokens_per_second)?;
    writeln!(out, "Total time:                 {:.2} ms", r.total_time_ms)?;
    writeln!(out)?;
    writeln!(out, "Suggestions:")?;
    for s in &analysis.suggestions {
        writeln!(out, "  [{}] {}: {}", s.priority, s.category, s.suggestion)?;
        writeln!(out, "         impact: {}", s.impact)?;
    }
    Ok(())
}

fn write_concurrency(out: &mut String, result: &ConcurrencyResult) -> fmt::Result {
    let m = &result.memory_breakdown;
    writeln!(out, "Devices:                    {}", result.device_count)?;
    writeln!(out, "Device memory:              {:.4} GB", result.hardware_memory_gb)?;
    writeln!(out, "Available for requests:     {:.4} GB", result.available_memory_gb)?;
    writeln!(out, "Per-request memory:         {:.4} GB", m.total_memory_gb)?;
    writeln!(out, "  weights:                  {:.4} GB", m.weight_memory_gb)?;
    writeln!(out, "  framework overhead:       {:.4} GB", m.framework_overhead_gb)?;
    writeln!(out, "  KV cache:                 {:.4} GB", m.kv_cache_memory_gb)?;
    writeln!(out, "  activations:              {:.4} GB", m.activation_memory_gb)?;
    writeln!(out, "Max concurrency:            {}", result.max_concurrency_without_pa)?;
    writeln!(out, "Max concurrency (paged KV): {}", result.max_concurrency_with_pa)
}

fn write_hardware(out: &mut String, hardware: &[HardwarePreset]) -> fmt::Result {
    writeln!(out, "Hardware:")?;
    for hw in hardware {
        let s = &hw.spec;
        writeln!(
            out,
            "  {:<20} fp16 {:>7.1}  bf32 {:>7.1}  fp32 {:>7.1} TFLOPS  {:>6.1} GB  {:>6.3} TB/s",
            hw.name,
            s.fp16_peak_tflops,
            s.bf32_peak_tflops,
            s.fp32_peak_tflops,
            s.memory_size_gb,
            s.memory_bandwidth_tbps
        )?;
    }
    Ok(())
}

fn write_models(out: &mut String, models: &[ModelPreset]) -> fmt::Result {
    writeln!(out, "Models:")?;
    for model in models {
        let s = &model.spec;
        let attention = if s.uses_grouped_query_attention() { "GQA" } else { "MHA" };
        writeln!(
            out,
            "  {:<20} {:>6.1}B  layers {:>3}  hidden {:>5}  heads {:>3}/{:<3} {}  vocab {:>6}",
            model.name,
            s.params_billions,
            s.num_layers,
            s.hidden_size,
            s.num_attention_heads,
            s.num_key_value_heads,
            attention,
            s.vocab_size
        )?;
    }
    Ok(())
}

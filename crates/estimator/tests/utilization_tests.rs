use fathom_estimator::utilization::{classify_bottleneck, decode_flops, model_memory_bytes};
use fathom_estimator::{
    estimate, BottleneckType, Catalog, HardwareSpec, ModelArchitectureSpec, Precision,
    WorkloadDescriptor,
};

fn a100() -> HardwareSpec {
    HardwareSpec {
        fp16_peak_tflops: 1248.0,
        bf32_peak_tflops: 624.0,
        fp32_peak_tflops: 312.0,
        memory_size_gb: 80.0,
        memory_bandwidth_tbps: 2.039,
    }
}

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

fn long_context_workload() -> WorkloadDescriptor {
    WorkloadDescriptor::new(Precision::Fp16, 50.0, 10.0, 2048, 128)
}

#[test]
fn test_long_context_scenario() {
    let result = estimate(&a100(), &llama_7b(), &long_context_workload());

    assert!(result.mfu > 0.0 && result.mfu <= 100.0);
    assert_eq!(result.mfu, 2.8);
    assert_eq!(result.memory_bandwidth_utilization, 0.54);
    assert_eq!(result.total_time_ms, 1330.0);
    assert_eq!(result.peak_flops, 1248.0);
    assert_eq!(result.prefill_flops, 43_705_587_204_096.0);
    assert_eq!(result.decode_flops, 2_731_599_200_256.0);
    assert!(result.prefill_flops > result.decode_flops);
    assert_eq!(result.theoretical_flops, 46.44);
    assert_eq!(result.kv_cache_bytes, 1_140_850_688.0);
    assert_eq!(result.model_memory_bytes, 13_476_298_752.0);
    assert_eq!(result.tokens_per_second, 96.24);
    assert_eq!(result.bottleneck_type, BottleneckType::Balanced);
}

#[test]
fn test_short_context_long_generation() {
    let workload = WorkloadDescriptor::new(Precision::Fp16, 50.0, 10.0, 512, 2048);
    let result = estimate(&a100(), &llama_7b(), &workload);

    assert!(result.decode_flops > result.prefill_flops);
    assert_eq!(result.total_time_ms, 50.0 + 2048.0 * 10.0);
}

#[test]
fn test_zero_time_pins_actual_to_peak() {
    let workload = WorkloadDescriptor::new(Precision::Fp16, 0.0, 0.0, 2048, 128);
    let result = estimate(&a100(), &llama_7b(), &workload);

    assert_eq!(result.total_time_ms, 0.0);
    assert_eq!(result.actual_flops, 1248.0);
    assert_eq!(result.peak_flops, 1248.0);
    assert_eq!(result.mfu, 100.0);
    assert_eq!(result.memory_bandwidth_utilization, 0.0);
    assert_eq!(result.tokens_per_second, 0.0);
    assert_eq!(result.bottleneck_type, BottleneckType::Compute);
}

#[test]
fn test_output_ties_round_to_even() {
    // 1.125 + 1 * 1.0 = 2.125 ms
    let workload = WorkloadDescriptor::new(Precision::Fp16, 1.125, 1.0, 16, 1);
    let result = estimate(&a100(), &llama_7b(), &workload);

    assert_eq!(result.total_time_ms, 2.12);
}

#[test]
fn test_huge_lengths_do_not_overflow() {
    let workload = WorkloadDescriptor::new(Precision::Fp16, 50.0, 10.0, u64::MAX, u64::MAX / 2)
        .with_batch_size(4);
    let result = estimate(&a100(), &llama_7b(), &workload);

    assert!(result.tokens_per_second.is_finite() && result.tokens_per_second > 0.0);
    assert!(result.kv_cache_bytes.is_finite() && result.kv_cache_bytes > 0.0);
    assert!(result.decode_flops.is_finite());
}

#[test]
fn test_builtin_presets_match_hand_built_records() {
    let catalog = Catalog::builtin();
    let hardware = catalog.hardware("NVIDIA A100 80GB").unwrap();
    let model = catalog.model("Llama-2-7b").unwrap();

    assert_eq!(hardware.spec, a100());
    assert_eq!(model.spec, llama_7b());
}

#[test]
fn test_decode_flops_linear_in_batch() {
    let model = llama_7b();
    assert_eq!(decode_flops(&model, 128, 2), 2.0 * decode_flops(&model, 128, 1));

    let single = estimate(&a100(), &model, &long_context_workload());
    let batched = estimate(
        &a100(),
        &model,
        &long_context_workload().with_batch_size(2),
    );
    assert_eq!(batched.decode_flops, 2.0 * single.decode_flops);
    assert_eq!(batched.prefill_flops, single.prefill_flops);
}

#[test]
fn test_full_precision_weights_are_twice_half() {
    let model = llama_7b();
    assert_eq!(
        model_memory_bytes(&model, Precision::Fp32.bytes()),
        2.0 * model_memory_bytes(&model, Precision::Fp16.bytes())
    );

    let half = estimate(&a100(), &model, &long_context_workload());
    let mut workload = long_context_workload();
    workload.precision = Precision::Fp32;
    let full = estimate(&a100(), &model, &workload);
    assert_eq!(full.model_memory_bytes, 2.0 * half.model_memory_bytes);
}

#[test]
fn test_peak_flops_linear_in_devices() {
    let single = estimate(&a100(), &llama_7b(), &long_context_workload());
    for devices in [2u64, 4, 8] {
        let result = estimate(
            &a100(),
            &llama_7b(),
            &long_context_workload().with_device_count(devices),
        );
        assert_eq!(result.peak_flops, devices as f64 * single.peak_flops);
    }
}

#[test]
fn test_bandwidth_utilization_decreases_with_devices() {
    let mut previous = f64::INFINITY;
    for devices in [1u64, 2, 4] {
        let result = estimate(
            &a100(),
            &llama_7b(),
            &long_context_workload().with_device_count(devices),
        );
        assert!(
            result.memory_bandwidth_utilization < previous,
            "utilization did not drop at {} devices",
            devices
        );
        previous = result.memory_bandwidth_utilization;
    }
}

#[test]
fn test_estimate_is_deterministic() {
    let first = estimate(&a100(), &llama_7b(), &long_context_workload());
    let second = estimate(&a100(), &llama_7b(), &long_context_workload());

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_tiny_tpot_pushes_mfu_above_100() {
    let h100 = Catalog::builtin().hardware("NVIDIA H100 80GB").unwrap().spec;
    let workload = WorkloadDescriptor::new(Precision::Fp16, 1.0, 0.001, 2048, 128);

    let result = estimate(&h100, &llama_7b(), &workload);
    // Not clamped.
    assert!(result.mfu > 100.0);
}

#[test]
fn test_huge_tpot_gives_tiny_mfu() {
    let workload = WorkloadDescriptor::new(Precision::Fp16, 50.0, 10_000.0, 2048, 128);
    let result = estimate(&a100(), &llama_7b(), &workload);

    assert!(result.mfu >= 0.0 && result.mfu < 1.0);
}

#[test]
fn test_zero_peak_reports_zero_mfu() {
    let hardware = HardwareSpec {
        fp16_peak_tflops: 0.0,
        ..a100()
    };
    let result = estimate(&hardware, &llama_7b(), &long_context_workload());

    assert_eq!(result.mfu, 0.0);
    assert_eq!(result.peak_flops, 0.0);
    assert!(result.actual_flops > 0.0);
}

#[test]
fn test_zero_bandwidth_reports_zero_utilization() {
    let hardware = HardwareSpec {
        memory_bandwidth_tbps: 0.0,
        ..a100()
    };
    let result = estimate(&hardware, &llama_7b(), &long_context_workload());

    assert_eq!(result.memory_bandwidth_utilization, 0.0);
    assert_eq!(result.mfu, 2.8);
}

#[test]
fn test_every_precision_gives_positive_mfu() {
    for precision in Precision::ALL {
        let mut workload = long_context_workload();
        workload.precision = precision;
        let result = estimate(&a100(), &llama_7b(), &workload);
        assert!(
            result.mfu > 0.0 && result.mfu <= 100.0,
            "{} gave mfu {}",
            precision,
            result.mfu
        );
    }
}

#[test]
fn test_bf16_uses_reduced_peak() {
    let mut workload = long_context_workload();
    workload.precision = Precision::Bf16;
    let result = estimate(&a100(), &llama_7b(), &workload);

    assert_eq!(result.peak_flops, 624.0);
}

#[test]
fn test_zero_generated_length_has_no_decode_work() {
    let workload = WorkloadDescriptor::new(Precision::Fp16, 50.0, 10.0, 2048, 0);
    assert!(workload.validate().is_err());

    let result = estimate(&a100(), &llama_7b(), &workload);
    assert_eq!(result.decode_flops, 0.0);
    assert_eq!(result.tokens_per_second, 0.0);
    assert_eq!(result.total_time_ms, 50.0);
}

#[test]
fn test_classification_regions() {
    assert_eq!(classify_bottleneck(85.0, 20.0), BottleneckType::Compute);
    assert_eq!(classify_bottleneck(10.0, 90.0), BottleneckType::Memory);
    assert_eq!(classify_bottleneck(50.0, 50.0), BottleneckType::Balanced);
    assert_eq!(classify_bottleneck(80.0, 80.0), BottleneckType::Balanced);
    assert_eq!(classify_bottleneck(10.0, 10.0), BottleneckType::Balanced);
}

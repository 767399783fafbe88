use fathom_estimator::{
    estimate, estimate_concurrency, suggest, BottleneckType, Catalog, Precision, Priority,
    WorkloadDescriptor,
};
use proptest::prelude::*;

fn precision() -> impl Strategy<Value = Precision> {
    prop_oneof![
        Just(Precision::Fp16),
        Just(Precision::Bf16),
        Just(Precision::Fp32)
    ]
}

proptest! {
    #[test]
    fn prop_estimate_is_non_negative(
        precision in precision(),
        first_token in 0.1f64..5_000.0,
        tpot in 0.1f64..500.0,
        context in 1u64..32_768,
        generated in 1u64..4_096,
        batch in 1u64..64,
    ) {
        let catalog = Catalog::builtin();
        let workload = WorkloadDescriptor::new(precision, first_token, tpot, context, generated)
            .with_batch_size(batch);

        for hardware in &catalog.hardware {
            for model in &catalog.models {
                let result = estimate(&hardware.spec, &model.spec, &workload);
                prop_assert!(result.mfu >= 0.0);
                prop_assert!(result.memory_bandwidth_utilization >= 0.0);
                prop_assert!(result.tokens_per_second > 0.0);
            }
        }
    }

    #[test]
    fn prop_paged_attention_never_hurts(
        precision in precision(),
        devices in 1u64..16,
        context in 1u64..131_072,
        overhead in 0.0f64..16.0,
    ) {
        let catalog = Catalog::builtin();
        for hardware in &catalog.hardware {
            for model in &catalog.models {
                let result = estimate_concurrency(
                    &hardware.spec, &model.spec, devices, context, precision, overhead,
                );
                prop_assert!(result.max_concurrency_with_pa >= result.max_concurrency_without_pa);
            }
        }
    }

    #[test]
    fn prop_balanced_advice_is_low_priority(mfu in 0.0f64..200.0, bw in 0.0f64..200.0) {
        let suggestions = suggest(mfu, bw, BottleneckType::Balanced, None, None);
        prop_assert!(suggestions.iter().all(|s| s.priority != Priority::High));
    }

    #[test]
    fn prop_suggestions_never_empty(mfu in 0.0f64..200.0, bw in 0.0f64..200.0) {
        for bottleneck in [BottleneckType::Compute, BottleneckType::Memory, BottleneckType::Balanced] {
            prop_assert!(!suggest(mfu, bw, bottleneck, None, None).is_empty());
        }
    }
}

use std::convert::Infallible;

use proptest::prelude::*;
use timing_lab::{summarize, Harness, SampleSet};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn measure_returns_one_sample_per_call(n in 1usize..200) {
        let harness = Harness::new();
        let mut calls = 0usize;
        let samples = harness
            .measure(|| { calls += 1; Ok::<_, Infallible>(calls) }, n)
            .unwrap();
        prop_assert_eq!(samples.len(), n);
        prop_assert_eq!(calls, n);
    }

    #[test]
    fn summarize_is_idempotent(values in prop::collection::vec(0u64..1_000_000_000, 1..300)) {
        let samples = SampleSet::from_nanos(values).unwrap();
        prop_assert_eq!(summarize(&samples), summarize(&samples));
    }

    #[test]
    fn identical_values_have_no_spread(v in 0u64..1_000_000_000_000, n in 1usize..500) {
        let stats = summarize(&SampleSet::from_nanos(vec![v; n]).unwrap());
        prop_assert_eq!(stats.mean, v as f64);
        prop_assert_eq!(stats.median, v);
        prop_assert_eq!(stats.q1, v);
        prop_assert_eq!(stats.q3, v);
        prop_assert_eq!(stats.std_dev, 0.0);
        prop_assert_eq!(stats.outlier_count, 0);
    }

    #[test]
    fn ranks_are_ordered(values in prop::collection::vec(0u64..10_000, 1..300)) {
        let stats = summarize(&SampleSet::from_nanos(values).unwrap());
        prop_assert!(stats.min <= stats.q1);
        prop_assert!(stats.q1 <= stats.median);
        prop_assert!(stats.median <= stats.q3);
        prop_assert!(stats.q3 <= stats.max);
        prop_assert!(stats.std_dev >= 0.0);
        prop_assert_eq!(stats.outlier_count, stats.outlier_indices.len());
    }
}

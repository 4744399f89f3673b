#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Finite coordinates in a range covering both pixel and projected values.
pub fn arb_coordinate() -> BoxedStrategy<f64> {
    prop_oneof![
        -1.0e4..1.0e4f64,
        -1.0e7..1.0e7f64,
        Just(0.0),
        Just(-0.0),
    ]
    .boxed()
}

/// Parallel flat source and target arrays holding `1..=max_pairs` pairs.
pub fn arb_parallel_arrays(max_pairs: usize) -> BoxedStrategy<(Vec<f64>, Vec<f64>)> {
    (1..=max_pairs)
        .prop_flat_map(|pairs| {
            (
                prop::collection::vec(arb_coordinate(), pairs * 2),
                prop::collection::vec(arb_coordinate(), pairs * 2),
            )
        })
        .boxed()
}

/// A flat array with an odd number of values.
pub fn arb_odd_array(max_len: usize) -> BoxedStrategy<Vec<f64>> {
    (0..max_len / 2)
        .prop_flat_map(|half| prop::collection::vec(arb_coordinate(), half * 2 + 1))
        .boxed()
}

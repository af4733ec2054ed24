//! S5 — the same attribute set discovered in two different literal orders
//! (and with different delays, per §9) must collapse to a single pool entry.

use gnp_core::{Dataset, EngineConfig, RulePool};
use gnp_core::filter::{self, FilterStats};
use ndarray::Array2;

fn dataset() -> Dataset {
    let n = 10;
    let mut flat = Vec::with_capacity(n * 2);
    for _ in 0..n {
        flat.push(1i64);
        flat.push(1i64);
    }
    let attrs = Array2::from_shape_vec((n, 2), flat).unwrap();
    let target = vec![1.0; n];
    let timestamps: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
    Dataset::from_parts(vec!["A1".to_string(), "A2".to_string()], attrs, target, timestamps)
}

#[test]
fn attribute_set_discovered_twice_registers_once() {
    let ds = dataset();
    let cfg = EngineConfig {
        future_span: 2,
        max_time_delay: 1,
        min_attributes: 2,
        minsup: 0.0,
        min_support_count: 0,
        quadrant_threshold_rate: 0.5,
        ..EngineConfig::default()
    };
    let mut stats = FilterStats::default();
    let mut pool = RulePool::new(10);

    let first = filter::admit(vec![(0, 1), (1, 0)], &ds, &cfg, &mut stats).unwrap();
    assert!(pool.register(first));

    let second = filter::admit(vec![(1, 0), (0, 1)], &ds, &cfg, &mut stats).unwrap();
    assert!(pool.contains_key(&second.key()), "second traversal's attribute set must already be present");

    let third = filter::admit(vec![(1, 1), (0, 0)], &ds, &cfg, &mut stats).unwrap();
    assert!(
        pool.contains_key(&third.key()),
        "identity ignores delays (§9): a different delay pairing for the same attribute set is still a duplicate"
    );

    assert_eq!(pool.len(), 1);
}

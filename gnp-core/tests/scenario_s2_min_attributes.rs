//! S2 — a single perfect one-attribute rule. Rejected by the default
//! `MIN_ATTRIBUTES = 2`, admitted once it is lowered to 1.

use gnp_core::filter::{self, FilterStats};
use gnp_core::{Dataset, EngineConfig};
use ndarray::Array2;

fn dataset() -> Dataset {
    let n = 10;
    let attrs = Array2::from_elem((n, 1), 1i64);
    let target = vec![1.0; n];
    let timestamps: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
    Dataset::from_parts(vec!["A1".to_string()], attrs, target, timestamps)
}

#[test]
fn single_attribute_rule_has_perfect_statistics_when_admitted() {
    let ds = dataset();
    let cfg = EngineConfig {
        future_span: 2,
        max_time_delay: 0,
        min_attributes: 1,
        minsup: 0.0,
        min_support_count: 1,
        quadrant_threshold_rate: 0.5,
        ..EngineConfig::default()
    };
    let mut stats = FilterStats::default();
    let rule = filter::admit(vec![(0, 0)], &ds, &cfg, &mut stats).expect("rule must be admitted with MIN_ATTRIBUTES=1");

    assert_eq!(rule.support_count, 8); // N - F = 10 - 2
    assert_eq!(rule.mean[0], 1.0);
    assert_eq!(rule.mean[1], 1.0);
    assert_eq!(rule.sigma[0], 0.0);
    assert_eq!(rule.sigma[1], 0.0);
    assert_eq!(rule.concentration, 1.0);
    assert_eq!(rule.support_rate, 1.0);
    assert_eq!(stats.passed, 1);
}

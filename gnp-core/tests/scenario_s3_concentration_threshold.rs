//! S3 — quadrant concentration right at the threshold boundary.
//! `N=12, F=2, A=2`, a rule matches all 10 admissible indices, split evenly
//! 5/5 between two quadrants (concentration exactly 0.50).

use gnp_core::filter::{self, FilterStats};
use gnp_core::{Dataset, EngineConfig};
use ndarray::Array2;

fn dataset() -> Dataset {
    let n = 12;
    let mut flat = Vec::with_capacity(n * 2);
    for _ in 0..n {
        flat.push(1i64);
        flat.push(1i64);
    }
    let attrs = Array2::from_shape_vec((n, 2), flat).unwrap();
    let target: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
    let timestamps: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
    Dataset::from_parts(vec!["A1".to_string(), "A2".to_string()], attrs, target, timestamps)
}

fn base_config() -> EngineConfig {
    EngineConfig {
        future_span: 2,
        max_time_delay: 0,
        min_attributes: 2,
        minsup: 0.0,
        min_support_count: 0,
        ..EngineConfig::default()
    }
}

#[test]
fn borderline_concentration_is_admitted_with_strict_less_than() {
    let ds = dataset();
    let cfg = EngineConfig {
        quadrant_threshold_rate: 0.50,
        ..base_config()
    };
    let mut stats = FilterStats::default();
    let rule = filter::admit(vec![(0, 0), (1, 0)], &ds, &cfg, &mut stats);
    assert!(rule.is_some(), "concentration == threshold must pass a strict `<` rejection test");
    assert_eq!(rule.unwrap().concentration, 0.5);
}

#[test]
fn raising_the_threshold_past_the_boundary_rejects_it() {
    let ds = dataset();
    let cfg = EngineConfig {
        quadrant_threshold_rate: 0.51,
        ..base_config()
    };
    let mut stats = FilterStats::default();
    let rule = filter::admit(vec![(0, 0), (1, 0)], &ds, &cfg, &mut stats);
    assert!(rule.is_none());
    assert_eq!(stats.rejected_concentration, 1);
}

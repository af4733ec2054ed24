//! S1 — no matches anywhere in the dataset: the pool stays empty and the
//! zero-match path is rejected for a documented reason, not silently.

use gnp_core::{Dataset, Engine, EngineConfig};
use ndarray::Array2;

fn dataset_all_zero(n: usize, a: usize) -> Dataset {
    let attrs = Array2::from_elem((n, a), 0i64);
    let target = vec![1.0; n];
    let timestamps: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
    Dataset::from_parts((0..a).map(|i| format!("A{i}")).collect(), attrs, target, timestamps)
}

#[test]
fn empty_attribute_matrix_yields_an_empty_pool() {
    let ds = dataset_all_zero(10, 2);
    let cfg = EngineConfig {
        n_population: 6,
        n_process_nodes: 3,
        n_judgement_nodes: 6,
        k_max: 3,
        min_attributes: 2,
        generations: 2,
        elite_size: 2,
        crossover_pairs: 1,
        nkousa: 1,
        max_time_delay: 0,
        future_span: 2,
        ntrials: 1,
        seed: 1,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(ds, cfg).unwrap();
    let pool = engine.run();

    assert!(pool.is_empty());
    let stats = engine.filter_stats();
    assert_eq!(stats.passed, 0);
    assert!(stats.total_candidates() > 0, "extraction should still be attempted");
    assert!(
        stats.rejected_concentration > 0 || stats.rejected_minsup > 0,
        "zero matches must be rejected, whichever stage reaches it first"
    );
}

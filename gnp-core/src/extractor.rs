//! Rule extraction (§4.4): turn the kernel's per-path chains into normalized
//! candidate attribute sets, filter them, and register survivors.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::evolution::AdaptiveMemory;
use crate::filter::{self, FilterStats};
use crate::genome::Population;
use crate::kernel::Accumulators;
use crate::pool::RulePool;
use crate::rule::Literal;

/// Normalize one `(individual, start_node)` chain's most recent traversal up
/// to `depth` into a canonical, attribute-sorted literal list (§4.4 step 2):
/// scan attribute ids in ascending order, keep those the chain actually
/// visited, pairing each with the *last* delay observed for it.
fn normalize_chain(acc: &Accumulators, i: usize, sk: usize, depth: usize, n_attrs: usize) -> Vec<Literal> {
    let mut last_delay: HashMap<usize, usize> = HashMap::new();
    for d in 1..=depth {
        let slot = acc.attr_chain[(i, sk, d)];
        if slot == 0 {
            continue;
        }
        let attr_id = slot - 1;
        let delay = acc.delay_chain[(i, sk, d)];
        last_delay.insert(attr_id, delay);
    }
    (0..n_attrs)
        .filter_map(|a| last_delay.get(&a).map(|&delay| (a, delay)))
        .collect()
}

/// Walk every `(individual, start_node, depth)` cell the kernel touched,
/// normalize it into a candidate rule, filter it, and register survivors
/// into `pool`; credit the adaptive memory and accumulate fitness as §4.6
/// step 6 describes. Stops admitting entirely once `pool` is full (§7: "stop
/// admitting further rules in that trial"), so every candidate that reaches
/// `filter::admit` either becomes a registered rule or a counted duplicate —
/// `stats.passed == unique_rules + stats.duplicates` always holds.
pub fn extract_and_register(
    acc: &Accumulators,
    population: &Population,
    dataset: &Dataset,
    cfg: &EngineConfig,
    pool: &mut RulePool,
    memory: &mut AdaptiveMemory,
    fitness: &mut [f64],
    stats: &mut FilterStats,
) {
    let n_attrs = dataset.n_attributes();
    let m = population.len();
    let p = acc.n_start_nodes();
    let max_depth = acc.max_depth().min(cfg.k_max);

    'outer: for i in 0..m {
        for sk in 0..p {
            for depth in cfg.min_attributes..=max_depth {
                if pool.is_full() {
                    if cfg.verbose {
                        eprintln!("extractor: pool is full, stopping admission for this trial");
                    }
                    break 'outer;
                }

                let attrs = normalize_chain(acc, i, sk, depth, n_attrs);
                if attrs.len() < cfg.min_attributes {
                    stats.rejected_min_attrs += 1;
                    continue;
                }

                let Some(rule) = filter::admit(attrs, dataset, cfg, stats) else {
                    continue;
                };

                let reward = rule.support_rate * 10.0 + rule.concentration * 100.0;
                let key = rule.key();

                if pool.contains_key(&key) {
                    stats.duplicates += 1;
                    fitness[i] += reward;
                    continue;
                }

                let bonus = rule.high_support || rule.low_variance;
                for &(attr_id, delay) in &rule.attrs {
                    memory.credit(delay, attr_id, bonus);
                }
                fitness[i] += reward + 20.0;
                pool.register(rule);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use ndarray::Array2;
    use rand::{rngs::StdRng, SeedableRng};

    fn dataset_two_attrs_all_ones(n: usize) -> Dataset {
        let attrs = Array2::from_elem((n, 2), 1i64);
        let target = vec![1.0; n];
        let timestamps: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
        Dataset::from_parts(vec!["A1".to_string(), "A2".to_string()], attrs, target, timestamps)
    }

    #[test]
    fn extraction_registers_and_credits_memory() {
        let ds = dataset_two_attrs_all_ones(30);
        let mut rng = StdRng::seed_from_u64(11);
        let cfg = EngineConfig {
            n_process_nodes: 4,
            n_judgement_nodes: 10,
            k_max: 3,
            min_attributes: 2,
            max_time_delay: 0,
            future_span: 2,
            minsup: 0.0,
            min_support_count: 1,
            quadrant_threshold_rate: 0.5,
            ..EngineConfig::default()
        };
        let pop = Population::init_random(3, cfg.n_process_nodes, cfg.n_judgement_nodes, 2, cfg.max_time_delay, &mut rng);
        let acc = crate::kernel::evaluate(&pop, &ds, &cfg);

        let mut pool = RulePool::new(100);
        let mut memory = AdaptiveMemory::new(cfg.history_generations, cfg.max_time_delay, 2);
        let mut fitness = vec![0.0; 3];
        let mut stats = FilterStats::default();

        extract_and_register(&acc, &pop, &ds, &cfg, &mut pool, &mut memory, &mut fitness, &mut stats);

        assert!(stats.total_candidates() > 0);
    }

    #[test]
    fn stops_admitting_once_pool_is_full_and_counters_still_close() {
        let ds = dataset_two_attrs_all_ones(30);
        let mut rng = StdRng::seed_from_u64(11);
        let cfg = EngineConfig {
            n_process_nodes: 4,
            n_judgement_nodes: 10,
            k_max: 3,
            min_attributes: 2,
            max_time_delay: 0,
            future_span: 2,
            minsup: 0.0,
            min_support_count: 1,
            quadrant_threshold_rate: 0.5,
            ..EngineConfig::default()
        };
        let pop = Population::init_random(3, cfg.n_process_nodes, cfg.n_judgement_nodes, 2, cfg.max_time_delay, &mut rng);
        let acc = crate::kernel::evaluate(&pop, &ds, &cfg);

        // Capacity 1 forces the pool to fill after the first unique rule.
        let mut pool = RulePool::new(1);
        let mut memory = AdaptiveMemory::new(cfg.history_generations, cfg.max_time_delay, 2);
        let mut fitness = vec![0.0; 3];
        let mut stats = FilterStats::default();

        extract_and_register(&acc, &pop, &ds, &cfg, &mut pool, &mut memory, &mut fitness, &mut stats);

        assert!(pool.is_full());
        assert_eq!(stats.passed, pool.len() as u64 + stats.duplicates);
    }

    #[test]
    fn normalize_chain_keeps_last_observed_delay() {
        let mut acc = accumulators_test_helper();
        acc.attr_chain[(0, 0, 1)] = 1; // attribute id 0
        acc.delay_chain[(0, 0, 1)] = 2;
        acc.attr_chain[(0, 0, 2)] = 1; // same attribute id, later depth
        acc.delay_chain[(0, 0, 2)] = 5;
        let literals = normalize_chain(&acc, 0, 0, 2, 1);
        assert_eq!(literals, vec![(0, 5)]);
    }

    fn accumulators_test_helper() -> Accumulators {
        crate::kernel::evaluate(
            &Population::init_random(1, 1, 2, 1, 0, &mut StdRng::seed_from_u64(1)),
            &dataset_two_attrs_all_ones(5),
            &EngineConfig {
                n_process_nodes: 1,
                n_judgement_nodes: 2,
                k_max: 2,
                max_time_delay: 0,
                future_span: 2,
                ..EngineConfig::default()
            },
        )
    }
}

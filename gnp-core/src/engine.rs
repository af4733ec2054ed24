//! Engine façade (§10.4): the single entry point a driver crate calls.
//!
//! Owns the dataset, population, per-trial/global pools and adaptive memory,
//! and drives the `trial × generation` loop of §2. Mirrors the way
//! `autoeq_de::DifferentialEvolution::solve` is the one method a caller
//! invokes after building a `DEConfig`.

use rand::{rngs::StdRng, SeedableRng};

use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::error::EngineError;
use crate::evolution::{self, AdaptiveMemory};
use crate::extractor;
use crate::filter::FilterStats;
use crate::genome::Population;
use crate::kernel;
use crate::pool::{GlobalPool, RulePool};

/// Owning aggregate for one mining run (§9's "replace pervasive global
/// mutable arrays with an owning aggregate" design note).
pub struct Engine {
    dataset: Dataset,
    cfg: EngineConfig,
    global_pool: GlobalPool,
    stats: FilterStats,
}

impl Engine {
    pub fn new(dataset: Dataset, cfg: EngineConfig) -> Result<Engine, EngineError> {
        if cfg.k_max < cfg.min_attributes {
            return Err(EngineError::KMaxBelowMinAttributes {
                k_max: cfg.k_max,
                min_attributes: cfg.min_attributes,
            });
        }
        if cfg.n_judgement_nodes == 0 {
            return Err(EngineError::NoJudgementNodes);
        }
        if cfg.n_process_nodes == 0 {
            return Err(EngineError::NoProcessNodes);
        }
        if cfg.n_population != 3 * cfg.elite_size {
            return Err(EngineError::PopulationNotTripleElite {
                n_population: cfg.n_population,
                elite_size: cfg.elite_size,
                expected: 3 * cfg.elite_size,
            });
        }
        Ok(Engine {
            dataset,
            cfg,
            global_pool: GlobalPool::new(),
            stats: FilterStats::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn global_pool(&self) -> &GlobalPool {
        &self.global_pool
    }

    pub fn filter_stats(&self) -> &FilterStats {
        &self.stats
    }

    /// Run every trial to completion (or early pool-stop) and merge each
    /// trial's pool into the global one. Returns the global pool.
    pub fn run(&mut self) -> &GlobalPool {
        for trial in 0..self.cfg.ntrials {
            let trial_seed = self.cfg.seed.wrapping_add(trial as u64);
            let mut rng = StdRng::seed_from_u64(trial_seed);

            let mut population = Population::init_random(
                self.cfg.n_population,
                self.cfg.n_process_nodes,
                self.cfg.n_judgement_nodes,
                self.dataset.n_attributes(),
                self.cfg.max_time_delay,
                &mut rng,
            );
            let mut trial_pool = RulePool::new(self.cfg.nrulemax);
            let mut memory = AdaptiveMemory::new(self.cfg.history_generations, self.cfg.max_time_delay, self.dataset.n_attributes());
            let mut trial_stats = FilterStats::default();

            for gen in 0..self.cfg.generations {
                let mut fitness = evolution::reset_fitness(self.cfg.n_population);

                let acc = kernel::evaluate(&population, &self.dataset, &self.cfg);
                extractor::extract_and_register(
                    &acc,
                    &population,
                    &self.dataset,
                    &self.cfg,
                    &mut trial_pool,
                    &mut memory,
                    &mut fitness,
                    &mut trial_stats,
                );
                memory.age(gen);

                if self.cfg.verbose {
                    let best = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                    eprintln!(
                        "trial {trial} gen {gen}: pool={} passed={} dup={} best_fitness={best:.3}",
                        trial_pool.len(),
                        trial_stats.passed,
                        trial_stats.duplicates,
                    );
                }

                if trial_pool.len() >= self.cfg.pool_stop_size() {
                    if self.cfg.verbose {
                        eprintln!("trial {trial}: pool reached stop size at gen {gen}, ending trial early");
                    }
                    break;
                }

                let ranks = evolution::rank(&fitness);
                population = evolution::elite_replicate(&population, &ranks, self.cfg.elite_size);
                evolution::crossover(&mut population, &self.cfg, &mut rng);
                evolution::mutate_start_nodes(&mut population, &self.cfg, &mut rng);
                evolution::mutate_judgement_next(&mut population, &self.cfg, &mut rng);
                evolution::mutate_delay(&mut population, &self.cfg, &memory, &mut rng);
                evolution::mutate_attr(&mut population, &self.cfg, &memory, self.dataset.n_attributes(), &mut rng);
            }

            let merged = self.global_pool.merge_trial(trial_pool);
            if self.cfg.verbose {
                eprintln!("trial {trial}: merged {merged} new rules, global pool size {}", self.global_pool.len());
            }
            self.stats.merge(&trial_stats);
        }

        &self.global_pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn toy_dataset(n: usize) -> Dataset {
        let attrs = Array2::from_elem((n, 2), 1i64);
        let target = vec![1.0; n];
        let timestamps: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
        Dataset::from_parts(vec!["A1".to_string(), "A2".to_string()], attrs, target, timestamps)
    }

    #[test]
    fn rejects_inconsistent_k_max() {
        let cfg = EngineConfig {
            k_max: 1,
            min_attributes: 2,
            ..EngineConfig::default()
        };
        let err = Engine::new(toy_dataset(20), cfg).unwrap_err();
        assert!(matches!(err, EngineError::KMaxBelowMinAttributes { .. }));
    }

    #[test]
    fn rejects_population_not_triple_elite() {
        let cfg = EngineConfig {
            n_population: 8,
            elite_size: 2,
            ..EngineConfig::default()
        };
        let err = Engine::new(toy_dataset(20), cfg).unwrap_err();
        assert!(matches!(err, EngineError::PopulationNotTripleElite { .. }));
    }

    #[test]
    fn runs_a_small_deterministic_trial() {
        let cfg = EngineConfig {
            n_population: 12,
            n_process_nodes: 4,
            n_judgement_nodes: 10,
            k_max: 3,
            min_attributes: 2,
            generations: 3,
            elite_size: 4,
            crossover_pairs: 2,
            nkousa: 2,
            ntrials: 1,
            max_time_delay: 0,
            future_span: 2,
            minsup: 0.0,
            min_support_count: 1,
            quadrant_threshold_rate: 0.5,
            seed: 7,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(toy_dataset(40), cfg).unwrap();
        engine.run();
        assert!(engine.filter_stats().total_candidates() > 0);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let build_cfg = || EngineConfig {
            n_population: 12,
            n_process_nodes: 4,
            n_judgement_nodes: 10,
            k_max: 3,
            min_attributes: 2,
            generations: 3,
            elite_size: 4,
            crossover_pairs: 2,
            nkousa: 2,
            ntrials: 1,
            max_time_delay: 0,
            future_span: 2,
            minsup: 0.0,
            min_support_count: 1,
            quadrant_threshold_rate: 0.5,
            seed: 42,
            ..EngineConfig::default()
        };
        let mut e1 = Engine::new(toy_dataset(40), build_cfg()).unwrap();
        e1.run();
        let mut e2 = Engine::new(toy_dataset(40), build_cfg()).unwrap();
        e2.run();

        let keys1: Vec<_> = e1.global_pool().rules().iter().map(|r| r.key()).collect();
        let keys2: Vec<_> = e2.global_pool().rules().iter().map(|r| r.key()).collect();
        assert_eq!(keys1, keys2);
    }
}

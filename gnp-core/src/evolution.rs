//! Evolution operators and adaptive memory (§4.6, §4.8).
//!
//! Selection, crossover and mutation all act on gene arrays only; nothing
//! here touches the evaluation accumulators.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::EngineConfig;
use crate::genome::Population;

/// Per-individual fitness reset that also breaks rank ties deterministically
/// by individual index (§4.6 step 2, §5's ordering guarantee).
pub fn reset_fitness(m: usize) -> Vec<f64> {
    (0..m).map(|i| i as f64 * -1e-5).collect()
}

/// `rank[i] = |{ j : fitness[j] > fitness[i] }|`.
pub fn rank(fitness: &[f64]) -> Vec<usize> {
    fitness
        .iter()
        .map(|&fi| fitness.iter().filter(|&&fj| fj > fi).count())
        .collect()
}

/// Elite replication (§4.6 step 3): individuals with `rank < elite_size` are
/// copied into three cohorts that together cover the whole next population.
pub fn elite_replicate(population: &Population, rank: &[usize], elite_size: usize) -> Population {
    let m = population.len();
    let mut next: Vec<Option<_>> = (0..m).map(|_| None).collect();
    for i in 0..m {
        let r = rank[i];
        if r < elite_size {
            next[r] = Some(population.get(i).clone());
            next[r + elite_size] = Some(population.get(i).clone());
            next[r + 2 * elite_size] = Some(population.get(i).clone());
        }
    }
    let individuals = next
        .into_iter()
        .enumerate()
        .map(|(slot, maybe)| {
            maybe.unwrap_or_else(|| panic!("elite cohort did not cover slot {slot}; elite_size * 3 must equal population size"))
        })
        .collect();
    Population::from_individuals(individuals)
}

/// Crossover (§4.6 step 4): for `i in [0, crossover_pairs)`, swap
/// `nkousa` randomly chosen judgment-node triples between individual `i`
/// and `i + crossover_pairs`.
pub fn crossover<R: Rng + ?Sized>(population: &mut Population, cfg: &EngineConfig, rng: &mut R) {
    let j = cfg.n_judgement_nodes;
    for i in 0..cfg.crossover_pairs {
        let partner = i + cfg.crossover_pairs;
        if partner >= population.len() {
            continue;
        }
        let (a, b) = population.pair_mut(i, partner);
        for _ in 0..cfg.nkousa {
            let slot = rng.random_range(0..j);
            a.swap_judgement_gene(b, slot);
        }
        a.copy_genes_to_nodes();
        b.copy_genes_to_nodes();
    }
}

/// Start-node rewire mutation (§4.6 step 5, first bullet): every individual,
/// independent Bernoulli per start node at rate `1/muratep`.
pub fn mutate_start_nodes<R: Rng + ?Sized>(population: &mut Population, cfg: &EngineConfig, rng: &mut R) {
    let p = cfg.n_process_nodes;
    let j = cfg.n_judgement_nodes;
    let rate = 1.0 / cfg.muratep as f64;
    for i in 0..population.len() {
        let ind = population.get_mut(i);
        for k in 0..p {
            if rng.random_bool(rate) {
                ind.set_start_next(k, rng.random_range(p..p + j));
            }
        }
    }
}

/// Judgment-node rewire mutation (§4.6 step 5, second bullet): individuals
/// `[elite_size, 2*elite_size)`, independent Bernoulli per node at rate
/// `1/muratej`.
pub fn mutate_judgement_next<R: Rng + ?Sized>(population: &mut Population, cfg: &EngineConfig, rng: &mut R) {
    let p = cfg.n_process_nodes;
    let j = cfg.n_judgement_nodes;
    let rate = 1.0 / cfg.muratej as f64;
    let lo = cfg.elite_size;
    let hi = (2 * cfg.elite_size).min(population.len());
    for i in lo..hi {
        let ind = population.get_mut(i);
        for slot in 0..j {
            if rng.random_bool(rate) {
                ind.genes_mut().next[slot] = rng.random_range(p..p + j);
            }
        }
        ind.copy_genes_to_nodes();
    }
}

/// Sliding-window usage histories over the last `H` generations, per delay
/// value and per attribute id, biasing roulette-wheel mutation (§4.8).
#[derive(Debug, Clone)]
pub struct AdaptiveMemory {
    d_max: usize,
    n_attrs: usize,
    delay_window: VecDeque<Vec<u32>>,
    attr_window: VecDeque<Vec<u32>>,
}

/// Value a freshly-aged row is primed to every 5th generation, to keep a
/// trickle of exploration alive even after histories have gone quiet.
const REFRESH_PRIME: u32 = 1;

impl AdaptiveMemory {
    pub fn new(history_generations: usize, d_max: usize, n_attrs: usize) -> Self {
        let delay_window = (0..history_generations).map(|_| vec![0u32; d_max + 1]).collect();
        let attr_window = (0..history_generations).map(|_| vec![0u32; n_attrs.max(1)]).collect();
        Self {
            d_max,
            n_attrs,
            delay_window,
            attr_window,
        }
    }

    /// Credit a newly registered rule's delay/attribute usage into the
    /// current (front) generation row. `bonus` is true when the rule is
    /// flagged `high_support` or `low_variance` (§4.8's success bonus: +2 on
    /// top of the baseline +1).
    pub fn credit(&mut self, delay: usize, attr: usize, bonus: bool) {
        let weight = if bonus { 3 } else { 1 };
        if let Some(row) = self.delay_window.front_mut() {
            if delay < row.len() {
                row[delay] += weight;
            }
        }
        if let Some(row) = self.attr_window.front_mut() {
            if attr < row.len() {
                row[attr] += weight;
            }
        }
    }

    /// Age the sliding window by one generation (§4.6 step 1's second half):
    /// drop the oldest row, push a fresh one. On generations divisible by 5
    /// the fresh row is primed to a small constant instead of zero.
    pub fn age(&mut self, generation: usize) {
        let refresh = generation % 5 == 0;
        self.delay_window.pop_back();
        self.delay_window.push_front(vec![if refresh { REFRESH_PRIME } else { 0 }; self.d_max + 1]);
        self.attr_window.pop_back();
        self.attr_window
            .push_front(vec![if refresh { REFRESH_PRIME } else { 0 }; self.n_attrs.max(1)]);
    }

    fn total_weight(window: &VecDeque<Vec<u32>>, len: usize) -> Vec<u32> {
        let mut totals = vec![0u32; len];
        for row in window {
            for (t, &v) in totals.iter_mut().zip(row.iter()) {
                *t += v;
            }
        }
        totals
    }

    /// Roulette-pick a delay in `0..=d_max`, weighted by usage history.
    /// Returns `None` when every weight is zero (caller should fall back to
    /// uniform sampling).
    pub fn roulette_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        roulette_pick(&Self::total_weight(&self.delay_window, self.d_max + 1), rng)
    }

    /// Roulette-pick an attribute id in `0..n_attrs`.
    pub fn roulette_attr<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        roulette_pick(&Self::total_weight(&self.attr_window, self.n_attrs), rng)
    }
}

fn roulette_pick<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<usize> {
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return None;
    }
    let mut draw = rng.random_range(0..total);
    for (i, &w) in weights.iter().enumerate() {
        if draw < w {
            return Some(i);
        }
        draw -= w;
    }
    None
}

/// Adaptive delay mutation (§4.6 step 5, third bullet): individuals
/// `[elite_size, 3*elite_size)`, independent Bernoulli per node at rate
/// `1/muratedelay`, resampling from the roulette table when active.
pub fn mutate_delay<R: Rng + ?Sized>(
    population: &mut Population,
    cfg: &EngineConfig,
    memory: &AdaptiveMemory,
    rng: &mut R,
) {
    let j = cfg.n_judgement_nodes;
    let rate = 1.0 / cfg.muratedelay as f64;
    let lo = cfg.elite_size;
    let hi = (3 * cfg.elite_size).min(population.len());
    for i in lo..hi {
        let ind = population.get_mut(i);
        for slot in 0..j {
            if rng.random_bool(rate) {
                let new_delay = if cfg.adaptive_mutation {
                    memory.roulette_delay(rng).unwrap_or_else(|| rng.random_range(0..=cfg.max_time_delay))
                } else {
                    rng.random_range(0..=cfg.max_time_delay)
                };
                ind.genes_mut().delay[slot] = new_delay;
            }
        }
        ind.copy_genes_to_nodes();
    }
}

/// Adaptive attribute mutation (§4.6 step 5, fourth bullet): individuals
/// `[2*elite_size, 3*elite_size)`, independent Bernoulli per node at rate
/// `1/muratea`, resampling from the roulette table when active.
pub fn mutate_attr<R: Rng + ?Sized>(
    population: &mut Population,
    cfg: &EngineConfig,
    memory: &AdaptiveMemory,
    n_attrs: usize,
    rng: &mut R,
) {
    let j = cfg.n_judgement_nodes;
    let rate = 1.0 / cfg.muratea as f64;
    let lo = 2 * cfg.elite_size;
    let hi = (3 * cfg.elite_size).min(population.len());
    for i in lo..hi {
        let ind = population.get_mut(i);
        for slot in 0..j {
            if rng.random_bool(rate) {
                let new_attr = if cfg.adaptive_mutation {
                    memory.roulette_attr(rng).unwrap_or_else(|| rng.random_range(0..n_attrs))
                } else {
                    rng.random_range(0..n_attrs)
                };
                ind.genes_mut().attr[slot] = new_attr;
            }
        }
        ind.copy_genes_to_nodes();
    }
}

//! Evaluation kernel (§4.3): walks every individual's every start chain over
//! every admissible time index and accumulates per-`(individual, start,
//! depth)` statistics.
//!
//! Accumulators are backed by `ndarray::Array3`/`Array4` buffers rather than
//! nested `Vec<Vec<Vec<_>>>`, the same choice the teacher makes for its
//! population/energies buffers in `src-de`.

use ndarray::{Array3, Array4};

use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::genome::Population;

/// Raw per-`(individual, start_node, depth)` counters and future statistics
/// produced by one full pass of [`evaluate`].
#[derive(Debug, Clone)]
pub struct Accumulators {
    m: usize,
    p: usize,
    k_depth: usize,

    /// `match_count[i,k,d]`.
    pub match_count: Array3<u32>,
    /// `evaluation_count[i,k,d]`.
    pub evaluation_count: Array3<u32>,
    /// `attr_chain[i,k,d]`: `0` means unused, else `attribute_id + 1`. This is
    /// a per-path snapshot of the most recent traversal, not an aggregate.
    pub attr_chain: Array3<usize>,
    /// `delay_chain[i,k,d]`, paired with `attr_chain`.
    pub delay_chain: Array3<usize>,
    /// `future_sum[i,k,d,f]` for `f ∈ {0,1}` mapping to `t+1, t+2`.
    pub future_sum: Array4<f64>,
    pub future_sqsum: Array4<f64>,
    pub future_min: Array4<f64>,
    pub future_max: Array4<f64>,
    /// `quadrant_count[i,k,d,q]` for `q ∈ {0..3}` (`Q1..Q4`).
    pub quadrant_count: Array4<u32>,
}

impl Accumulators {
    fn new(m: usize, p: usize, k_max: usize) -> Self {
        let k_depth = k_max + 1;
        Self {
            m,
            p,
            k_depth,
            match_count: Array3::zeros((m, p, k_depth)),
            evaluation_count: Array3::zeros((m, p, k_depth)),
            attr_chain: Array3::zeros((m, p, k_depth)),
            delay_chain: Array3::zeros((m, p, k_depth)),
            future_sum: Array4::zeros((m, p, k_depth, 2)),
            future_sqsum: Array4::zeros((m, p, k_depth, 2)),
            future_min: Array4::from_elem((m, p, k_depth, 2), f64::INFINITY),
            future_max: Array4::from_elem((m, p, k_depth, 2), f64::NEG_INFINITY),
            quadrant_count: Array4::zeros((m, p, k_depth, 4)),
        }
    }

    pub fn n_individuals(&self) -> usize {
        self.m
    }

    pub fn n_start_nodes(&self) -> usize {
        self.p
    }

    /// Inclusive max usable depth (`0..=k_max`).
    pub fn max_depth(&self) -> usize {
        self.k_depth - 1
    }

    /// Unbiased sample mean/sigma of `future_{f}` at cell `(i,k,d)`, per
    /// §4.3's closure step. `n` is the *matching* count for that cell, not
    /// the evaluation count. Negative intermediate variance (floating-point
    /// error) is clamped to zero.
    pub fn mean_sigma(&self, i: usize, k: usize, d: usize, f: usize, n: u32) -> (f64, f64) {
        if n == 0 {
            return (0.0, 0.0);
        }
        let nf = n as f64;
        let sum = self.future_sum[(i, k, d, f)];
        let sqsum = self.future_sqsum[(i, k, d, f)];
        let mean = sum / nf;
        if n < 2 {
            return (mean, 0.0);
        }
        let var = (sqsum / nf - mean * mean) * nf / (nf - 1.0);
        (mean, var.max(0.0).sqrt())
    }
}

/// Assign a matched future pair `(x1, x2)` to a quadrant index `0..=3`
/// (`Q1..Q4`), treating `0` as the positive side (§4.3, §9).
#[inline]
pub fn quadrant_index(x1: f64, x2: f64) -> usize {
    match (x1 >= 0.0, x2 >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

/// Run the full population over every admissible time index (§4.3's
/// algorithm). Single-threaded, deterministic given `population`'s state and
/// `dataset`.
pub fn evaluate(population: &Population, dataset: &Dataset, cfg: &EngineConfig) -> Accumulators {
    let m = population.len();
    let p = if m > 0 { population.get(0).n_process_nodes() } else { cfg.n_process_nodes };
    let mut acc = Accumulators::new(m, p, cfg.k_max);

    let range = dataset.safe_range_kernel(cfg.max_time_delay, cfg.future_span);

    for t in range {
        for i in 0..m {
            let ind = population.get(i);
            for k in 0..p {
                let mut depth = 0usize;
                acc.match_count[(i, k, 0)] += 1;
                acc.evaluation_count[(i, k, 0)] += 1;

                let mut cur = ind.start_next(k);
                let mut matching = true;

                while cur >= p && depth < cfg.k_max {
                    depth += 1;
                    let node = ind.judge_node(cur);
                    acc.attr_chain[(i, k, depth)] = node.attr + 1;
                    acc.delay_chain[(i, k, depth)] = node.delay;

                    if node.delay > t {
                        cur = k;
                        break;
                    }
                    let idx = t - node.delay;
                    let v = dataset.attr(idx, node.attr);

                    match v {
                        1 => {
                            if matching {
                                acc.match_count[(i, k, depth)] += 1;
                                accumulate_future(&mut acc, dataset, i, k, depth, t);
                            }
                            acc.evaluation_count[(i, k, depth)] += 1;
                            cur = node.next;
                        }
                        0 => {
                            acc.evaluation_count[(i, k, depth)] += 1;
                            cur = k;
                            break;
                        }
                        _ => {
                            acc.evaluation_count[(i, k, depth)] += 1;
                            matching = false;
                            cur = node.next;
                        }
                    }
                }
            }
        }
    }

    acc
}

fn accumulate_future(acc: &mut Accumulators, dataset: &Dataset, i: usize, k: usize, depth: usize, t: usize) {
    let n = dataset.n_rows();
    let row1 = t + 1;
    let row2 = t + 2;
    let x1 = if row1 < n { Some(dataset.target(row1)) } else { None };
    let x2 = if row2 < n { Some(dataset.target(row2)) } else { None };

    for (f, x) in [(0usize, x1), (1usize, x2)] {
        if let Some(v) = x {
            if v.is_finite() {
                acc.future_sum[(i, k, depth, f)] += v;
                acc.future_sqsum[(i, k, depth, f)] += v * v;
                if v < acc.future_min[(i, k, depth, f)] {
                    acc.future_min[(i, k, depth, f)] = v;
                }
                if v > acc.future_max[(i, k, depth, f)] {
                    acc.future_max[(i, k, depth, f)] = v;
                }
            }
        }
    }

    if let (Some(v1), Some(v2)) = (x1, x2) {
        if v1.is_finite() && v2.is_finite() {
            let q = quadrant_index(v1, v2);
            acc.quadrant_count[(i, k, depth, q)] += 1;
        }
    }
}

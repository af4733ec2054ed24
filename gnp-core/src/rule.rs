//! Registered rule and its derived statistics (§3, §4.4, §4.5).

use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::kernel::quadrant_index;

/// One attribute literal: `(attribute_id, delay)`, both zero-based.
pub type Literal = (usize, usize);

/// A rule admitted by the filter, with its statistics frozen at registration
/// (§3's invariant I2: support and future stats share one matched-index set).
#[derive(Debug, Clone)]
pub struct Rule {
    pub attrs: Vec<Literal>,
    pub matched_indices: Vec<usize>,
    pub support_count: usize,
    pub support_rate: f64,
    pub mean: [f64; 2],
    pub sigma: [f64; 2],
    pub min: [f64; 2],
    pub max: [f64; 2],
    pub quadrant_counts: [u32; 4],
    pub dominant_quadrant: usize,
    pub concentration: f64,
    pub high_support: bool,
    pub low_variance: bool,
}

impl Rule {
    /// Identity used for deduplication: the attribute ids alone, sorted
    /// (§9 — delays are deliberately excluded from rule identity).
    pub fn key(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.attrs.iter().map(|(a, _)| *a).collect();
        ids.sort_unstable();
        ids
    }

    pub fn max_delay(&self) -> usize {
        self.attrs.iter().map(|(_, d)| *d).max().unwrap_or(0)
    }

    /// Build a rule's statistics from its (already rule-specific-rematched)
    /// matched index set (§3's derived-statistics block, §4.5 Stage A-E
    /// feeds this after the rematch).
    pub fn from_matches(
        attrs: Vec<Literal>,
        matched_indices: Vec<usize>,
        dataset: &Dataset,
        cfg: &EngineConfig,
    ) -> Rule {
        let n = dataset.n_rows();
        let m = matched_indices.len();

        let mut sum = [0.0f64; 2];
        let mut sqsum = [0.0f64; 2];
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        let mut valid_n = [0u32; 2];
        let mut quadrant_counts = [0u32; 4];
        let mut total_valid_quadrant = 0u32;

        for &t in &matched_indices {
            let row1 = t + 1;
            let row2 = t + 2;
            let x1 = if row1 < n { Some(dataset.target(row1)) } else { None };
            let x2 = if row2 < n { Some(dataset.target(row2)) } else { None };

            for (f, x) in [(0usize, x1), (1usize, x2)] {
                if let Some(v) = x {
                    if v.is_finite() {
                        sum[f] += v;
                        sqsum[f] += v * v;
                        min[f] = min[f].min(v);
                        max[f] = max[f].max(v);
                        valid_n[f] += 1;
                    }
                }
            }

            if let (Some(v1), Some(v2)) = (x1, x2) {
                if v1.is_finite() && v2.is_finite() {
                    quadrant_counts[quadrant_index(v1, v2)] += 1;
                    total_valid_quadrant += 1;
                }
            }
        }

        let mut mean = [0.0f64; 2];
        let mut sigma = [0.0f64; 2];
        for f in 0..2 {
            let nf = valid_n[f] as f64;
            if valid_n[f] > 0 {
                mean[f] = sum[f] / nf;
            }
            if valid_n[f] >= 2 {
                let var = (sqsum[f] / nf - mean[f] * mean[f]) * nf / (nf - 1.0);
                sigma[f] = var.max(0.0).sqrt();
            }
        }

        let dominant_quadrant = quadrant_counts
            .iter()
            .enumerate()
            .max_by_key(|(_, c)| **c)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let concentration = if total_valid_quadrant > 0 {
            quadrant_counts[dominant_quadrant] as f64 / total_valid_quadrant as f64
        } else {
            0.0
        };

        let denom = match cfg.support_denominator_mode {
            crate::config::SupportDenominatorMode::NMinusF => {
                (n.saturating_sub(cfg.future_span)).max(1) as f64
            }
            crate::config::SupportDenominatorMode::NMinusSMax => {
                let s_max = attrs.iter().map(|(_, d)| *d).max().unwrap_or(0) + cfg.future_span;
                (n.saturating_sub(s_max)).max(1) as f64
            }
        };
        let support_rate = m as f64 / denom;

        let high_support = support_rate >= 2.0 * cfg.minsup;
        let low_variance = sigma.iter().cloned().fold(0.0f64, f64::max) <= 0.5 * cfg.maxsigma;

        Rule {
            attrs,
            matched_indices,
            support_count: m,
            support_rate,
            mean,
            sigma,
            min,
            max,
            quadrant_counts,
            dominant_quadrant,
            concentration,
            high_support,
            low_variance,
        }
    }
}

//! Admissibility filter (§4.5): rule-specific rematch, quadrant
//! concentration, deviation, support floor, dispersion.

use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::rule::{Literal, Rule};

/// Category-specific rejection tallies (§7, §8 property 7: their sum plus
/// `passed` equals the total number of candidates handed to the filter).
#[derive(Debug, Clone, Default)]
pub struct FilterStats {
    pub passed: u64,
    pub duplicates: u64,
    pub rejected_minsup: u64,
    pub rejected_min_count: u64,
    pub rejected_min_attrs: u64,
    pub rejected_concentration: u64,
    pub rejected_deviation: u64,
    pub rejected_maxsigma: u64,
}

impl FilterStats {
    /// Fold another trial's tallies into this one (used by the engine to
    /// aggregate filter statistics across trials).
    pub fn merge(&mut self, other: &FilterStats) {
        self.passed += other.passed;
        self.duplicates += other.duplicates;
        self.rejected_minsup += other.rejected_minsup;
        self.rejected_min_count += other.rejected_min_count;
        self.rejected_min_attrs += other.rejected_min_attrs;
        self.rejected_concentration += other.rejected_concentration;
        self.rejected_deviation += other.rejected_deviation;
        self.rejected_maxsigma += other.rejected_maxsigma;
    }

    pub fn total_candidates(&self) -> u64 {
        self.passed
            + self.rejected_minsup
            + self.rejected_min_count
            + self.rejected_min_attrs
            + self.rejected_concentration
            + self.rejected_deviation
            + self.rejected_maxsigma
    }
}

/// Stage A: recompute matches over the rule's own safe range, replacing the
/// kernel's raw (wider) count.
fn rematch(attrs: &[Literal], dataset: &Dataset, future_span: usize) -> Vec<usize> {
    let max_delay = attrs.iter().map(|(_, d)| *d).max().unwrap_or(0);
    let range = dataset.safe_range_rule(max_delay, future_span);
    range
        .filter(|&t| attrs.iter().all(|&(a, d)| dataset.attr(t - d, a) == 1))
        .collect()
}

/// Stage C's per-quadrant deviation band.
fn within_deviation_band(dominant_quadrant: usize, x1: f64, x2: f64, dev: f64) -> bool {
    match dominant_quadrant {
        0 => x1 >= -dev && x2 >= -dev,
        1 => x1 <= dev && x2 >= -dev,
        2 => x1 <= dev && x2 <= dev,
        3 => x1 >= -dev && x2 <= dev,
        _ => unreachable!("quadrant index is always in 0..=3"),
    }
}

/// Run a candidate attribute set through Stages A-E. Returns the admitted
/// rule (with Stage-A's matched indices as authoritative) or `None`,
/// incrementing the matching counter in `stats` either way.
pub fn admit(attrs: Vec<Literal>, dataset: &Dataset, cfg: &EngineConfig, stats: &mut FilterStats) -> Option<Rule> {
    let matched_indices = rematch(&attrs, dataset, cfg.future_span);
    let rule = Rule::from_matches(attrs, matched_indices, dataset, cfg);

    if rule.concentration < cfg.quadrant_threshold_rate {
        stats.rejected_concentration += 1;
        return None;
    }

    for &t in &rule.matched_indices {
        let x1 = dataset.target(t + 1);
        let x2 = dataset.target(t + 2);
        if !within_deviation_band(rule.dominant_quadrant, x1, x2, cfg.deviation_threshold) {
            stats.rejected_deviation += 1;
            return None;
        }
    }

    if rule.support_rate < cfg.minsup {
        stats.rejected_minsup += 1;
        return None;
    }
    if rule.support_count < cfg.min_support_count {
        stats.rejected_min_count += 1;
        return None;
    }

    for f in 0..2 {
        if rule.sigma[f] > cfg.maxsigma {
            stats.rejected_maxsigma += 1;
            return None;
        }
    }

    stats.passed += 1;
    Some(rule)
}

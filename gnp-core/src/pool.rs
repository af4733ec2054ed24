//! Rule pools (§4.7): a fixed-capacity per-trial pool and a cross-trial
//! global pool with attribute-set dedup.
//!
//! Merge moves `Rule` values (and their owned `matched_indices`) out of the
//! trial pool rather than cloning, matching the source's pointer-handoff
//! design (§9) the Rust way.

use crate::rule::Rule;

/// Per-trial pool. Registration is rejected once `capacity` is reached; the
/// extractor is expected to stop calling `register` after that (§4.6's
/// termination condition) and to have logged the pool-full warning once.
#[derive(Debug, Default)]
pub struct RulePool {
    capacity: usize,
    rules: Vec<Rule>,
}

impl RulePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rules: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rules.len() >= self.capacity
    }

    pub fn contains_key(&self, key: &[usize]) -> bool {
        self.rules.iter().any(|r| r.key() == key)
    }

    /// Register `rule`, freezing its matched-index list a second time under
    /// the rule-specific range (it was already computed by Stage A; this is
    /// the "snapshot into durable storage" step §4.7 describes). Returns
    /// `false` without inserting if the pool is already full.
    pub fn register(&mut self, rule: Rule) -> bool {
        if self.is_full() {
            return false;
        }
        self.rules.push(rule);
        true
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }
}

/// Cross-trial pool, capped at `Nrulemax * Ntrials`.
#[derive(Debug, Default)]
pub struct GlobalPool {
    rules: Vec<Rule>,
}

impl GlobalPool {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Move every rule out of `trial_pool` into the global pool, keeping the
    /// first-seen rule for any attribute set already present (§9's decided
    /// open question: first-write-wins). Returns the number actually merged.
    pub fn merge_trial(&mut self, trial_pool: RulePool) -> usize {
        let mut merged = 0;
        for rule in trial_pool.into_rules() {
            let key = rule.key();
            if self.rules.iter().any(|r| r.key() == key) {
                continue;
            }
            self.rules.push(rule);
            merged += 1;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::dataset::Dataset;
    use crate::rule::Rule;
    use ndarray::Array2;

    fn toy_dataset() -> Dataset {
        let attrs = Array2::from_elem((4, 1), 1i64);
        let target = vec![1.0, 1.0, 1.0, 1.0];
        let timestamps: Vec<String> = (0..4).map(|i| format!("t{i}")).collect();
        Dataset::from_parts(vec!["A1".to_string()], attrs, target, timestamps)
    }

    fn rule_with_attrs(attrs: Vec<(usize, usize)>) -> Rule {
        let ds = toy_dataset();
        let cfg = EngineConfig::default();
        Rule::from_matches(attrs, vec![0, 1], &ds, &cfg)
    }

    #[test]
    fn register_rejects_once_full() {
        let mut pool = RulePool::new(1);
        assert!(pool.register(rule_with_attrs(vec![(0, 0)])));
        assert!(!pool.register(rule_with_attrs(vec![(1, 0)])));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn global_merge_is_first_write_wins() {
        let mut trial_a = RulePool::new(10);
        trial_a.register(rule_with_attrs(vec![(3, 1), (5, 0)]));
        let mut global = GlobalPool::new();
        assert_eq!(global.merge_trial(trial_a), 1);

        let mut trial_b = RulePool::new(10);
        trial_b.register(rule_with_attrs(vec![(5, 2), (3, 0)])); // same attribute set, different delays
        assert_eq!(global.merge_trial(trial_b), 0);
        assert_eq!(global.len(), 1);
        assert_eq!(global.rules()[0].attrs, vec![(3, 1), (5, 0)]);
    }
}

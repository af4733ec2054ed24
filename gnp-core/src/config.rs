//! Engine configuration: the compile-time constants of the reference engine,
//! exposed as a plain serializable value so a driver can override them from
//! CLI flags or a config file.

use serde::{Deserialize, Serialize};

/// Which denominator the admissibility filter uses for `support_rate`.
///
/// The shipped reference engine uses `N - F` everywhere, even though the
/// per-rule safe range is narrower (`N - S_max`, with `S_max = max_delay +
/// F`). `NMinusF` preserves bit-exact parity with that behaviour; `NMinusSMax`
/// is offered for callers who want the theoretically tighter denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportDenominatorMode {
    NMinusF,
    NMinusSMax,
}

impl Default for SupportDenominatorMode {
    fn default() -> Self {
        SupportDenominatorMode::NMinusF
    }
}

/// Full set of tunables recognised by the engine (§6 of the design spec).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub future_span: usize,
    pub max_time_delay: usize,
    pub k_max: usize,
    pub min_attributes: usize,

    pub n_population: usize,
    pub n_process_nodes: usize,
    pub n_judgement_nodes: usize,
    pub generations: usize,

    pub elite_size: usize,
    pub crossover_pairs: usize,
    pub nkousa: usize,

    pub muratep: usize,
    pub muratej: usize,
    pub muratea: usize,
    pub muratedelay: usize,

    pub minsup: f64,
    pub min_support_count: usize,
    pub maxsigma: f64,
    pub quadrant_threshold_rate: f64,
    pub deviation_threshold: f64,

    pub nrulemax: usize,
    pub ntrials: usize,
    pub history_generations: usize,
    pub adaptive_mutation: bool,

    pub seed: u64,
    pub support_denominator_mode: SupportDenominatorMode,

    /// Gate for the engine's per-generation trace output (mirrors `DEConfig::disp`).
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            future_span: 2,
            max_time_delay: 2,
            k_max: 7,
            min_attributes: 2,

            n_population: 120,
            n_process_nodes: 10,
            n_judgement_nodes: 100,
            generations: 201,

            elite_size: 40,
            crossover_pairs: 20,
            nkousa: 20,

            muratep: 1,
            muratej: 6,
            muratea: 6,
            muratedelay: 6,

            minsup: 0.003,
            min_support_count: 20,
            maxsigma: 999.0,
            quadrant_threshold_rate: 0.50,
            deviation_threshold: 1.0,

            nrulemax: 2002,
            ntrials: 1,
            history_generations: 5,
            adaptive_mutation: true,

            seed: 0,
            support_denominator_mode: SupportDenominatorMode::default(),

            verbose: false,
        }
    }
}

impl EngineConfig {
    /// Generations terminate a trial early once the per-trial pool reaches this size.
    pub fn pool_stop_size(&self) -> usize {
        self.nrulemax.saturating_sub(2)
    }
}

/// Fluent builder for `EngineConfig`, mirroring `autoeq_de::DEConfigBuilder`.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    cfg: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: EngineConfig::default(),
        }
    }

    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = v;
        self
    }

    pub fn ntrials(mut self, v: usize) -> Self {
        self.cfg.ntrials = v;
        self
    }

    pub fn generations(mut self, v: usize) -> Self {
        self.cfg.generations = v;
        self
    }

    pub fn min_attributes(mut self, v: usize) -> Self {
        self.cfg.min_attributes = v;
        self
    }

    pub fn max_time_delay(mut self, v: usize) -> Self {
        self.cfg.max_time_delay = v;
        self
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.cfg.verbose = v;
        self
    }

    pub fn support_denominator_mode(mut self, v: SupportDenominatorMode) -> Self {
        self.cfg.support_denominator_mode = v;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.k_max, 7);
        assert_eq!(cfg.n_population, 120);
        assert_eq!(cfg.elite_size, 40);
        assert_eq!(cfg.nrulemax, 2002);
        assert_eq!(cfg.pool_stop_size(), 2000);
    }

    #[test]
    fn builder_overrides_only_requested_fields() {
        let cfg = EngineConfigBuilder::new()
            .seed(42)
            .min_attributes(1)
            .build();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.min_attributes, 1);
        assert_eq!(cfg.n_population, 120);
    }

    #[test]
    fn roundtrips_through_json() {
        let cfg = EngineConfig::default();
        let s = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(back.seed, cfg.seed);
        assert_eq!(back.nrulemax, cfg.nrulemax);
    }
}

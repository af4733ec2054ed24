//! Copyright (C) 2025 Pierre Aubert pierre(at)spinorama(dot)org
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command-line interface definition (§10.3, §10.5): argument parsing lives
//! here, orchestration in `main.rs`, the same split as `src-autoeq/src/cli.rs`
//! + `src-autoeq/bin/autoeq.rs`.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use gnp_core::EngineConfig;

use crate::error::CliError;

/// Mine inter-transaction association rules from one dataset, or a directory
/// of datasets in batch mode.
#[derive(Parser, Debug, Clone)]
#[command(author, about, long_about = None)]
pub struct Args {
    /// Path to a single dataset CSV, or (with `--batch`) a directory of them.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Treat `input` as a directory and mine every `*.csv` file inside it.
    #[arg(long, default_value_t = false)]
    pub batch: bool,

    /// Directory to write the primary/secondary/verification outputs into;
    /// created if absent.
    #[arg(short, long, default_value = "gnp-output")]
    pub output_dir: PathBuf,

    /// Optional JSON config file; overrides `EngineConfig::default()`. CLI
    /// flags below override whatever this file sets.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub future_span: Option<usize>,
    #[arg(long)]
    pub max_time_delay: Option<usize>,
    #[arg(long)]
    pub k_max: Option<usize>,
    #[arg(long)]
    pub min_attributes: Option<usize>,
    #[arg(long)]
    pub n_population: Option<usize>,
    #[arg(long)]
    pub generations: Option<usize>,
    #[arg(long)]
    pub ntrials: Option<usize>,
    #[arg(long)]
    pub minsup: Option<f64>,
    #[arg(long)]
    pub min_support_count: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,

    /// Gate the engine's per-generation trace (mirrors `DEConfig::disp`).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Layer this invocation's flags over an optional config file over
    /// `EngineConfig::default()` (§10.3).
    pub fn resolve_engine_config(&self) -> Result<EngineConfig, CliError> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| CliError::Io {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&text).map_err(|source| CliError::BadConfig {
                    path: path.clone(),
                    source,
                })?
            }
            None => EngineConfig::default(),
        };

        if let Some(v) = self.future_span {
            cfg.future_span = v;
        }
        if let Some(v) = self.max_time_delay {
            cfg.max_time_delay = v;
        }
        if let Some(v) = self.k_max {
            cfg.k_max = v;
        }
        if let Some(v) = self.min_attributes {
            cfg.min_attributes = v;
        }
        if let Some(v) = self.n_population {
            cfg.n_population = v;
        }
        if let Some(v) = self.generations {
            cfg.generations = v;
        }
        if let Some(v) = self.ntrials {
            cfg.ntrials = v;
        }
        if let Some(v) = self.minsup {
            cfg.minsup = v;
        }
        if let Some(v) = self.min_support_count {
            cfg.min_support_count = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        cfg.verbose = self.verbose;

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let args = Args {
            input: PathBuf::from("data.csv"),
            batch: false,
            output_dir: PathBuf::from("out"),
            config: None,
            future_span: None,
            max_time_delay: None,
            k_max: Some(5),
            min_attributes: Some(1),
            n_population: None,
            generations: None,
            ntrials: None,
            minsup: None,
            min_support_count: None,
            seed: Some(99),
            verbose: true,
        };
        let cfg = args.resolve_engine_config().unwrap();
        assert_eq!(cfg.k_max, 5);
        assert_eq!(cfg.min_attributes, 1);
        assert_eq!(cfg.seed, 99);
        assert_eq!(cfg.n_population, EngineConfig::default().n_population);
        assert!(cfg.verbose);
    }
}

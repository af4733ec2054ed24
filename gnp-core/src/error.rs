//! Error taxonomy for `gnp-core` (§7 of the design spec).
//!
//! Nothing in the engine panics past dataset load: filter rejections are
//! counted, not raised, and numerical edge cases are clamped in place.

use std::path::PathBuf;
use thiserror::Error;

/// Failure modes for [`crate::dataset::Dataset::load`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {0}")]
    NotFound(PathBuf),

    #[error("malformed CSV header in {path}: {reason}")]
    BadHeader { path: PathBuf, reason: String },

    #[error("dataset {0} has no column named `X`")]
    MissingXColumn(PathBuf),

    #[error("dataset {0} has no column named `T` or `timestamp`")]
    MissingTColumn(PathBuf),

    #[error("failed to parse row {row} of {path}: {reason}")]
    ParseRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("dataset {0} has zero data rows")]
    EmptyDataset(PathBuf),

    #[error(
        "dataset {path} has {rows} rows but at least {required} are required (max_time_delay + future_span + 1)"
    )]
    TooFewRows {
        path: PathBuf,
        rows: usize,
        required: usize,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Programmer-error conditions detected at [`crate::engine::Engine::new`] time.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("k_max ({k_max}) must be >= min_attributes ({min_attributes})")]
    KMaxBelowMinAttributes { k_max: usize, min_attributes: usize },

    #[error("n_judgement_nodes must be > 0")]
    NoJudgementNodes,

    #[error("n_process_nodes must be > 0")]
    NoProcessNodes,

    #[error("n_population ({n_population}) must equal 3 * elite_size ({elite_size}, i.e. {expected})")]
    PopulationNotTripleElite {
        n_population: usize,
        elite_size: usize,
        expected: usize,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}

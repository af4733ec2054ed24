//! CLI error taxonomy (§10.2), mapped to the exit codes in §6 by `main`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    BadConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no CSV files found under {0}")]
    NoDatasetsFound(PathBuf),

    #[error(transparent)]
    Load(#[from] gnp_core::LoadError),

    #[error(transparent)]
    Engine(#[from] gnp_core::EngineError),
}

impl CliError {
    /// Exit code per §6: `1` for usage / dataset problems, everything else
    /// also folds to `1` since the driver has no other documented code.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

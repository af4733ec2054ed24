//! Per-symbol batch driver (§10.5): discover dataset files, run the engine
//! over each, write the three output formats.

use std::fs;
use std::path::{Path, PathBuf};

use gnp_core::{Dataset, Engine, EngineConfig};
use log::{info, warn};

use crate::error::CliError;
use crate::output;

/// Resolve `input` to the list of CSV files to mine: itself in single-file
/// mode, or every `*.csv` entry inside it (sorted) in batch mode.
pub fn collect_dataset_paths(input: &Path, batch: bool) -> Result<Vec<PathBuf>, CliError> {
    if !batch {
        return Ok(vec![input.to_path_buf()]);
    }

    let entries = fs::read_dir(input).map_err(|source| CliError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext.eq_ignore_ascii_case("csv")).unwrap_or(false))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(CliError::NoDatasetsFound(input.to_path_buf()));
    }
    Ok(paths)
}

/// Load one dataset, run the engine on it, and write its three output
/// formats under `output_root/<dataset stem>/`.
pub fn run_dataset(path: &Path, cfg: &EngineConfig, output_root: &Path) -> Result<(), CliError> {
    info!("loading dataset {}", path.display());
    let dataset = Dataset::load(path, cfg.max_time_delay, cfg.future_span)?;

    let mut engine = Engine::new(dataset, cfg.clone())?;
    let pool = engine.run();
    let stats = engine.filter_stats();

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "dataset".to_string());
    let symbol_dir = output_root.join(&stem);
    fs::create_dir_all(&symbol_dir).map_err(|source| CliError::Io {
        path: symbol_dir.clone(),
        source,
    })?;

    output::write_primary(symbol_dir.join("rules.tsv"), pool.rules(), engine.dataset(), cfg).map_err(|source| {
        CliError::Io {
            path: symbol_dir.join("rules.tsv"),
            source,
        }
    })?;
    output::write_secondary(symbol_dir.join("summary.txt"), pool.rules(), engine.dataset()).map_err(|source| {
        CliError::Io {
            path: symbol_dir.join("summary.txt"),
            source,
        }
    })?;
    output::write_verification(symbol_dir.join("verification"), pool.rules(), engine.dataset()).map_err(|source| {
        CliError::Io {
            path: symbol_dir.join("verification"),
            source,
        }
    })?;

    info!("{stem}: {} rules written to {}", pool.len(), symbol_dir.display());
    if stats.total_candidates() > 0 && stats.passed == 0 {
        warn!("{stem}: every candidate rule was rejected (filter stats: {stats:?})");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_mode_returns_the_input_itself() {
        let paths = collect_dataset_paths(Path::new("data.csv"), false).unwrap();
        assert_eq!(paths, vec![PathBuf::from("data.csv")]);
    }

    #[test]
    fn batch_mode_rejects_a_directory_with_no_csvs() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_dataset_paths(dir.path(), true).unwrap_err();
        assert!(matches!(err, CliError::NoDatasetsFound(_)));
    }

    #[test]
    fn batch_mode_finds_and_sorts_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "T,A1,X\n1,1,1\n").unwrap();
        fs::write(dir.path().join("a.csv"), "T,A1,X\n1,1,1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        let paths = collect_dataset_paths(dir.path(), true).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("a.csv"));
        assert!(paths[1].ends_with("b.csv"));
    }
}

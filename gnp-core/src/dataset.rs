//! Read-only dataset container (§3, §4.1).
//!
//! `Dataset` is immutable after [`Dataset::load`]: the kernel and the
//! admissibility filter only ever read from it.

use std::ops::Range;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use ndarray::Array2;

use crate::error::LoadError;

/// A loaded, validated binary-attribute time series.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Attribute names in header order (excludes `X` and the timestamp column).
    attribute_names: Vec<String>,
    /// `D[row][attribute]`, raw integer value. `1` = present, `0` = absent,
    /// anything else is "missing" and handled by the kernel, never here.
    attributes: Array2<i64>,
    /// Target series `X`.
    target: Vec<f64>,
    /// Timestamp strings, one per row.
    timestamps: Vec<String>,
}

impl Dataset {
    /// Number of rows `N`.
    pub fn n_rows(&self) -> usize {
        self.target.len()
    }

    /// Number of attributes `A`.
    pub fn n_attributes(&self) -> usize {
        self.attribute_names.len()
    }

    pub fn attribute_name(&self, attribute_id: usize) -> &str {
        &self.attribute_names[attribute_id]
    }

    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// Raw value of attribute `a` at row `row`. `1` means present, `0` means
    /// absent, any other value means missing.
    #[inline]
    pub fn attr(&self, row: usize, a: usize) -> i64 {
        self.attributes[(row, a)]
    }

    #[inline]
    pub fn target(&self, row: usize) -> f64 {
        self.target[row]
    }

    pub fn timestamp(&self, row: usize) -> &str {
        &self.timestamps[row]
    }

    /// `[max_delay, N - F)`, the admissible range for a specific rule's
    /// recount (§4.1).
    pub fn safe_range_rule(&self, max_delay: usize, future_span: usize) -> Range<usize> {
        let n = self.n_rows();
        let start = max_delay;
        let end = n.saturating_sub(future_span);
        if start >= end {
            start..start
        } else {
            start..end
        }
    }

    /// `[D_max, N - F)`, the conservative superset used by the kernel's time loop.
    pub fn safe_range_kernel(&self, max_time_delay: usize, future_span: usize) -> Range<usize> {
        self.safe_range_rule(max_time_delay, future_span)
    }

    /// Load a dataset from a CSV file (§4.1, §6).
    ///
    /// Exactly one column must be named `X` (the target) and exactly one must
    /// be named `T` or `timestamp`; every other column becomes an attribute.
    /// Column and field whitespace is trimmed. Row count must be at least
    /// `max_time_delay + future_span + 1`.
    pub fn load<P: AsRef<Path>>(
        path: P,
        max_time_delay: usize,
        future_span: usize,
    ) -> Result<Dataset, LoadError> {
        let path_buf: PathBuf = path.as_ref().to_path_buf();
        if !path_buf.exists() {
            return Err(LoadError::NotFound(path_buf));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&path_buf)
            .map_err(|e| LoadError::BadHeader {
                path: path_buf.clone(),
                reason: e.to_string(),
            })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LoadError::BadHeader {
                path: path_buf.clone(),
                reason: e.to_string(),
            })?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        let x_idx = headers
            .iter()
            .position(|h| h == "X")
            .ok_or_else(|| LoadError::MissingXColumn(path_buf.clone()))?;
        let t_idx = headers
            .iter()
            .position(|h| h == "T" || h == "timestamp")
            .ok_or_else(|| LoadError::MissingTColumn(path_buf.clone()))?;

        let attribute_names: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != x_idx && *i != t_idx)
            .map(|(_, h)| h.clone())
            .collect();
        let attribute_cols: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != x_idx && *i != t_idx)
            .map(|(i, _)| i)
            .collect();

        let mut target = Vec::new();
        let mut timestamps = Vec::new();
        let mut raw_attrs: Vec<i64> = Vec::new();

        for (row_idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| LoadError::ParseRow {
                path: path_buf.clone(),
                row: row_idx,
                reason: e.to_string(),
            })?;

            let x_val: f64 = record
                .get(x_idx)
                .ok_or_else(|| LoadError::ParseRow {
                    path: path_buf.clone(),
                    row: row_idx,
                    reason: "missing X field".to_string(),
                })?
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| LoadError::ParseRow {
                    path: path_buf.clone(),
                    row: row_idx,
                    reason: e.to_string(),
                })?;

            let t_val = record
                .get(t_idx)
                .ok_or_else(|| LoadError::ParseRow {
                    path: path_buf.clone(),
                    row: row_idx,
                    reason: "missing T field".to_string(),
                })?
                .trim()
                .to_string();

            for &col in &attribute_cols {
                let field = record.get(col).unwrap_or("").trim();
                // Any non-integer attribute value is treated as missing (a
                // large sentinel outside {0,1} rather than a parse failure).
                let v: i64 = field.parse().unwrap_or(i64::MIN);
                raw_attrs.push(v);
            }

            target.push(x_val);
            timestamps.push(t_val);
        }

        if target.is_empty() {
            return Err(LoadError::EmptyDataset(path_buf));
        }

        let required = max_time_delay + future_span + 1;
        if target.len() < required {
            return Err(LoadError::TooFewRows {
                path: path_buf,
                rows: target.len(),
                required,
            });
        }

        let n = target.len();
        let a = attribute_names.len();
        let attributes = Array2::from_shape_vec((n, a), raw_attrs).map_err(|e| LoadError::BadHeader {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;

        Ok(Dataset {
            attribute_names,
            attributes,
            target,
            timestamps,
        })
    }

    /// Build a dataset directly from in-memory data, bypassing CSV parsing.
    /// Used by tests and by callers that already hold parsed data in memory.
    pub fn from_parts(
        attribute_names: Vec<String>,
        attributes: Array2<i64>,
        target: Vec<f64>,
        timestamps: Vec<String>,
    ) -> Dataset {
        assert_eq!(attributes.nrows(), target.len());
        assert_eq!(attributes.ncols(), attribute_names.len());
        assert_eq!(timestamps.len(), target.len());
        Dataset {
            attribute_names,
            attributes,
            target,
            timestamps,
        }
    }
}

//! Output writers (§6, §10.5): primary TSV, secondary human summary, and a
//! verification CSV per rule. Manual line-writing via `std::io::Write`,
//! mirroring `OptimizationRecorder` in `src-de/src/optimization_recorder.rs`.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use gnp_core::{Dataset, EngineConfig, Rule};

fn attribute_field(dataset: &Dataset, rule: &Rule, slot: usize) -> String {
    match rule.attrs.get(slot) {
        Some(&(attr_id, delay)) => format!("{}(t-{delay})", dataset.attribute_name(attr_id)),
        None => "0".to_string(),
    }
}

/// Whether the dominant quadrant's first future value has a negative sign
/// (`Q2`/`Q3` in the kernel's `0..=3` quadrant indexing).
fn is_negative_leaning(rule: &Rule) -> bool {
    matches!(rule.dominant_quadrant, 1 | 2)
}

/// Primary rule pool output: one tab-separated line per rule (§6).
pub fn write_primary<P: AsRef<Path>>(path: P, rules: &[Rule], dataset: &Dataset, cfg: &EngineConfig) -> io::Result<()> {
    let mut f = File::create(path)?;

    for slot in 0..cfg.k_max {
        write!(f, "Attr{}\t", slot + 1)?;
    }
    write!(f, "X(t+1)_mean\tX(t+1)_sigma\tX(t+1)_min\tX(t+1)_max\t")?;
    write!(f, "X(t+2)_mean\tX(t+2)_sigma\tX(t+2)_min\tX(t+2)_max\t")?;
    writeln!(f, "SupportCount\tSupportRate\tNegative\tHighSupport\tLowVariance\tNumAttributes")?;

    for rule in rules {
        for slot in 0..cfg.k_max {
            write!(f, "{}\t", attribute_field(dataset, rule, slot))?;
        }
        for future in 0..2 {
            write!(
                f,
                "{:.6}\t{:.6}\t{:.6}\t{:.6}\t",
                rule.mean[future], rule.sigma[future], rule.min[future], rule.max[future]
            )?;
        }
        writeln!(
            f,
            "{}\t{:.6}\t{}\t{}\t{}\t{}",
            rule.support_count,
            rule.support_rate,
            is_negative_leaning(rule) as u8,
            rule.high_support as u8,
            rule.low_variance as u8,
            rule.attrs.len(),
        )?;
    }

    Ok(())
}

/// Human-readable summary: header comment plus up to the first 10 rules
/// (§6's secondary output).
pub fn write_secondary<P: AsRef<Path>>(path: P, rules: &[Rule], dataset: &Dataset) -> io::Result<()> {
    let mut f = File::create(path)?;
    writeln!(f, "# Total Rules: {}", rules.len())?;

    for (i, rule) in rules.iter().take(10).enumerate() {
        let literals: Vec<String> = rule
            .attrs
            .iter()
            .map(|&(attr_id, delay)| format!("{}(t-{delay})", dataset.attribute_name(attr_id)))
            .collect();
        writeln!(f, "Rule {i} ({} attrs): {}", rule.attrs.len(), literals.join(" "))?;
        for future in 0..2 {
            writeln!(f, "  => X(t+{}): {:.4}±{:.4}", future + 1, rule.mean[future], rule.sigma[future])?;
        }
    }

    Ok(())
}

/// One verification CSV per rule: every matched row's literal values and
/// concrete future values (§6).
pub fn write_verification<P: AsRef<Path>>(dir: P, rules: &[Rule], dataset: &Dataset) -> io::Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    for (rule_idx, rule) in rules.iter().enumerate() {
        let path = dir.join(format!("rule_{rule_idx:04}.csv"));
        let mut f = File::create(path)?;

        write!(f, "RowIndex,Timestamp")?;
        for &(attr_id, delay) in &rule.attrs {
            write!(f, ",{}_t-{delay}", dataset.attribute_name(attr_id))?;
        }
        writeln!(f, ",X(t+1),X(t+2)")?;

        for &t in &rule.matched_indices {
            write!(f, "{t},{}", dataset.timestamp(t))?;
            for &(attr_id, delay) in &rule.attrs {
                let row = t - delay;
                write!(f, ",{}", dataset.attr(row, attr_id))?;
            }
            let n = dataset.n_rows();
            let x1 = if t + 1 < n { dataset.target(t + 1).to_string() } else { "-".to_string() };
            let x2 = if t + 2 < n { dataset.target(t + 2).to_string() } else { "-".to_string() };
            writeln!(f, ",{x1},{x2}")?;
        }
    }

    Ok(())
}

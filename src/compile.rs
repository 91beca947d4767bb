// src/compile.rs

use anyhow::{Context, Result};
use glob::glob;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{info, warn};

use crate::config::{Config, NumericPolicy};
use crate::export;
use crate::process::{self, FileOutcome, MortalityRow, Period, SkipReason};
use crate::reference::ReferenceTables;

/// All months of all files, sorted by (subject, period).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConsolidatedDataset {
    rows: Vec<MortalityRow>,
}

impl ConsolidatedDataset {
    /// Concatenate per-file results and stable-sort them.
    pub fn from_parts(parts: Vec<Vec<MortalityRow>>) -> Self {
        let mut rows: Vec<MortalityRow> = parts.into_iter().flatten().collect();
        rows.sort_by(|a, b| {
            a.subject
                .cmp(&b.subject)
                .then_with(|| a.period.cmp(&b.period))
        });
        Self { rows }
    }

    pub fn rows(&self) -> &[MortalityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (subject, period) pairs that occur more than once. Reported, never removed.
    pub fn duplicate_keys(&self) -> Vec<(String, Period)> {
        // rows are sorted, so repeats are adjacent
        self.rows
            .windows(2)
            .filter(|w| w[0].subject == w[1].subject && w[0].period == w[1].period)
            .map(|w| (w[1].subject.clone(), w[1].period))
            .fold(Vec::new(), |mut acc, key| {
                if acc.last() != Some(&key) {
                    acc.push(key);
                }
                acc
            })
    }
}

/// What happened to each input file.
#[derive(Debug, Default)]
pub struct CompileSummary {
    pub files_seen: usize,
    pub processed: Vec<(PathBuf, Period, usize)>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    /// Files dropped under [`NumericPolicy::SkipFile`], with the error text.
    pub failed: Vec<(PathBuf, String)>,
}

/// Sorted list of `<dir>/*.<extension>`.
pub fn discover_inputs<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.{}", dir.as_ref().display(), extension);
    let mut files = Vec::new();
    for entry in glob(&pattern).with_context(|| format!("invalid glob pattern {}", pattern))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("cannot read glob entry: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// Process every input file in order and merge the results.
///
/// Skips never stop the batch. A numeric coercion failure stops it under
/// [`NumericPolicy::AbortRun`] and drops only that file under [`NumericPolicy::SkipFile`].
pub fn compile_files(
    files: &[PathBuf],
    reference: &ReferenceTables,
    policy: NumericPolicy,
) -> Result<(ConsolidatedDataset, CompileSummary)> {
    let mut summary = CompileSummary {
        files_seen: files.len(),
        ..Default::default()
    };
    let mut parts = Vec::with_capacity(files.len());

    for path in files {
        match process::process_file(path, reference) {
            Ok(FileOutcome::Processed { period, rows }) => {
                summary.processed.push((path.clone(), period, rows.len()));
                parts.push(rows);
            }
            Ok(FileOutcome::Skipped(reason)) => summary.skipped.push((path.clone(), reason)),
            Err(e) => match policy {
                NumericPolicy::AbortRun => {
                    return Err(e.context(format!("processing {}", path.display())));
                }
                NumericPolicy::SkipFile => {
                    warn!("{}: {:#}, skipping file", path.display(), e);
                    summary.failed.push((path.clone(), format!("{:#}", e)));
                }
            },
        }
    }

    let dataset = ConsolidatedDataset::from_parts(parts);
    info!("total records: {}", dataset.len());

    let dups = dataset.duplicate_keys();
    if !dups.is_empty() {
        let listed: Vec<String> = dups
            .iter()
            .map(|(subject, period)| format!("{} @ {}", subject, period.as_date_string()))
            .collect();
        warn!("duplicate (subject, period) rows: {}", listed.join(", "));
    }

    Ok((dataset, summary))
}

/// Full batch: load reference data, process `data_dir`, write outputs.
pub fn run(config: &Config) -> Result<CompileSummary> {
    let start = Instant::now();
    let reference = ReferenceTables::load(&config.reference_path)?;

    let files = discover_inputs(&config.data_dir, &config.input_extension)?;
    info!(
        "{} input files in {}",
        files.len(),
        config.data_dir.display()
    );

    let (dataset, summary) = compile_files(&files, &reference, config.numeric_policy)?;
    if dataset.is_empty() {
        warn!("no rows extracted; output will contain the header only");
    }
    if !summary.skipped.is_empty() || !summary.failed.is_empty() {
        warn!(
            skipped = summary.skipped.len(),
            failed = summary.failed.len(),
            "some input files were not included"
        );
    }

    export::export_all(&dataset, config)?;
    info!("all done in {:?}", start.elapsed());
    Ok(summary)
}

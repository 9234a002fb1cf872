//! Normalizes a run result into the fixed execution table.
//!
//! The aggregator never fails: input without any usable data yields an
//! `Unknown` row, and an internal failure while summing yields an `Error` row.

use super::types::{ReportRow, RowIndex, RunResult, RunStats, SpecResult, TestEntry};
use log::{error, warn};
use thiserror::Error;

pub const UNKNOWN_LABEL: &str = "Unknown";
pub const ERROR_LABEL: &str = "Error";
pub const TOTAL_LABEL: &str = "Total";

#[derive(Debug, Error)]
enum AggregateError {
    #[error("counter overflow while summing '{0}'")]
    CounterOverflow(&'static str),
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    total: u64,
    passed: u64,
    failed: u64,
    skipped: u64,
}

impl Counts {
    fn checked_add(self, row: &ReportRow) -> Result<Self, AggregateError> {
        let add = |acc: u64, value: u64, column: &'static str| {
            acc.checked_add(value)
                .ok_or(AggregateError::CounterOverflow(column))
        };
        Ok(Self {
            total: add(self.total, row.total, "total")?,
            passed: add(self.passed, row.passed, "passed")?,
            failed: add(self.failed, row.failed, "failed")?,
            skipped: add(self.skipped, row.skipped, "skipped")?,
        })
    }
}

/// Build one row per spec, in input order, followed by exactly one totals row.
pub fn aggregate(result: &RunResult) -> Vec<ReportRow> {
    if result.stats.is_none() && result.specs.is_none() {
        warn!("Invalid results object structure. Using default values.");
        return vec![ReportRow::sentinel(UNKNOWN_LABEL)];
    }

    match try_aggregate(result) {
        Ok(rows) => rows,
        Err(e) => {
            error!("Error formatting results: {}", e);
            vec![ReportRow::sentinel(ERROR_LABEL)]
        }
    }
}

fn try_aggregate(result: &RunResult) -> Result<Vec<ReportRow>, AggregateError> {
    let specs = result.specs.as_deref().unwrap_or_default();
    let mut rows: Vec<ReportRow> = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| spec_row(i + 1, spec))
        .collect();

    let summed = rows
        .iter()
        .try_fold(Counts::default(), |acc, row| acc.checked_add(row))?;

    let empty = RunStats::default();
    let stats = result.stats.as_ref().unwrap_or(&empty);

    rows.push(ReportRow {
        index: RowIndex::Total,
        spec_label: TOTAL_LABEL.to_string(),
        total: first_nonzero(&[stats.tests], summed.total),
        passed: first_nonzero(&[stats.passes], summed.passed),
        failed: first_nonzero(&[stats.failures], summed.failed),
        skipped: first_nonzero(&[stats.skipped, stats.pending], summed.skipped),
    });

    Ok(rows)
}

/// First candidate that is present and non-zero, else the fallback
fn first_nonzero(candidates: &[Option<u64>], fallback: u64) -> u64 {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|&v| v != 0)
        .unwrap_or(fallback)
}

fn spec_row(position: usize, spec: &SpecResult) -> ReportRow {
    let tests = spec.tests.as_deref().unwrap_or_default();

    ReportRow {
        index: RowIndex::Position(position),
        spec_label: spec_label(spec.file.as_deref()),
        total: spec.total.unwrap_or(tests.len() as u64),
        passed: spec
            .passes
            .unwrap_or_else(|| count_states(tests, &["passed"])),
        failed: spec
            .failures
            .unwrap_or_else(|| count_states(tests, &["failed"])),
        skipped: spec
            .skipped
            .unwrap_or_else(|| count_states(tests, &["skipped", "pending"])),
    }
}

fn count_states(tests: &[TestEntry], states: &[&str]) -> u64 {
    tests
        .iter()
        .filter(|t| t.state.as_deref().is_some_and(|s| states.contains(&s)))
        .count() as u64
}

/// Display label for a spec file.
///
/// Paths (with `/` or `\`) are reduced to the file name with every extension
/// removed, so `specs/login.spec.js` becomes `login`. Bare names are kept as-is.
pub fn spec_label(file: Option<&str>) -> String {
    let Some(file) = file.filter(|f| !f.is_empty()) else {
        return UNKNOWN_LABEL.to_string();
    };

    let is_separator = |c: char| c == '/' || c == '\\';
    if !file.contains(is_separator) {
        return file.to_string();
    }

    let base = file.rsplit(is_separator).next().unwrap_or(file);
    let (prefix, rest) = match base.strip_prefix('.') {
        Some(rest) => (".", rest),
        None => ("", base),
    };
    let stem = rest.split('.').next().unwrap_or(rest);

    if stem.is_empty() && prefix.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        format!("{}{}", prefix, stem)
    }
}

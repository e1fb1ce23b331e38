//! Run-log model: per-file outcomes, the append-only record buffer, and the
//! CSV write performed once at the end of a run.
//!
//! Decision logic never prints. Every per-file decision becomes an
//! [`Outcome`] wrapped in a [`LogRecord`]; records are buffered in a
//! [`RunLog`] (sequentially, or aggregated from worker results in input
//! order) and serialized in a single write, so rows are never interleaved.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

// ── Outcome taxonomy ──────────────────────────────────────────────────────
//
// Only configuration errors abort a run. Everything that can go wrong with
// one file is an outcome: logged, skipped, and the batch moves on.

/// Per-file decision recorded in the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Destination written; the name did not change.
    Copied,
    /// Destination written under a corrected name.
    Renamed,
    /// Destination already present; left untouched (resumable re-run).
    SkippedExists,
    /// No source file matched the expected name.
    MissingSource,
    /// Several source files matched; the first sorted candidate was copied.
    AmbiguousMatch,
    /// Filename did not follow the naming grammar; nothing was copied.
    Unmatched,
    /// The copy itself failed; the cause is kept in the record detail.
    CopyFailed,
}

impl Outcome {
    /// Log-file tag for this outcome.
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Copied => "copied",
            Outcome::Renamed => "renamed",
            Outcome::SkippedExists => "skipped-exists",
            Outcome::MissingSource => "missing-source",
            Outcome::AmbiguousMatch => "ambiguous-multiple-matches",
            Outcome::Unmatched => "unmatched",
            Outcome::CopyFailed => "copy-failed",
        }
    }

    /// True for the outcomes a clean resumable run is expected to produce.
    pub fn is_nominal(&self) -> bool {
        matches!(
            self,
            Outcome::Copied | Outcome::Renamed | Outcome::SkippedExists
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ── Records ───────────────────────────────────────────────────────────────

/// What happened to one source entry.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// RFC 3339 UTC timestamp taken when the decision was made.
    pub timestamp: String,
    pub outcome: Outcome,
    pub source: PathBuf,
    /// Destination path when one was determined (unmatched entries have none).
    pub dest: Option<PathBuf>,
    /// Free-form detail: candidate count for an ambiguous match, the OS error
    /// for a failed copy, empty otherwise.
    pub detail: String,
}

impl LogRecord {
    pub fn new(outcome: Outcome, source: impl Into<PathBuf>, dest: Option<PathBuf>) -> Self {
        Self::with_detail(outcome, source, dest, String::new())
    }

    pub fn with_detail(
        outcome: Outcome,
        source: impl Into<PathBuf>,
        dest: Option<PathBuf>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            outcome,
            source: source.into(),
            dest,
            detail: detail.into(),
        }
    }

    fn csv_row(&self) -> String {
        let source = self.source.display().to_string();
        let dest = self
            .dest
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        format!(
            "{},{},{},{},{}",
            self.timestamp,
            self.outcome.tag(),
            csv_field(&source),
            csv_field(&dest),
            csv_field(&self.detail),
        )
    }
}

/// Quote a CSV field only when it contains a delimiter, quote, or newline.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ── Run log ───────────────────────────────────────────────────────────────

/// Append-only buffer of log records for one run.
#[derive(Debug, Default)]
pub struct RunLog {
    records: Vec<LogRecord>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record.
    pub fn push(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    /// Fold a batch of worker results in, preserving their order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = LogRecord>) {
        self.records.extend(records);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Records for everything that did not go cleanly.
    pub fn anomalies(&self) -> impl Iterator<Item = &LogRecord> {
        self.records.iter().filter(|r| !r.outcome.is_nominal())
    }

    /// Tally records per outcome.
    pub fn summary(&self) -> RunSummary {
        let mut s = RunSummary::default();
        for rec in &self.records {
            match rec.outcome {
                Outcome::Copied => s.copied += 1,
                Outcome::Renamed => s.renamed += 1,
                Outcome::SkippedExists => s.skipped += 1,
                Outcome::MissingSource => s.missing += 1,
                Outcome::AmbiguousMatch => s.ambiguous += 1,
                Outcome::Unmatched => s.unmatched += 1,
                Outcome::CopyFailed => s.failed += 1,
            }
        }
        s
    }

    /// Write the whole log as CSV in one shot: a header row, then one row per
    /// record in append order.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut out = String::with_capacity(64 * (self.records.len() + 1));
        out.push_str("timestamp,outcome,source,destination,detail\n");
        for rec in &self.records {
            out.push_str(&rec.csv_row());
            out.push('\n');
        }
        fs::write(path, out).with_context(|| format!("writing run log {}", path.display()))
    }
}

/// Outcome tallies for the end-of-run report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub copied: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub missing: usize,
    pub ambiguous: usize,
    pub unmatched: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Total records tallied.
    pub fn total(&self) -> usize {
        self.copied
            + self.renamed
            + self.skipped
            + self.missing
            + self.ambiguous
            + self.unmatched
            + self.failed
    }

    /// Count of non-nominal records.
    pub fn anomaly_count(&self) -> usize {
        self.missing + self.ambiguous + self.unmatched + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} renamed, {} skipped, {} missing, {} ambiguous, {} unmatched, {} failed",
            self.copied,
            self.renamed,
            self.skipped,
            self.missing,
            self.ambiguous,
            self.unmatched,
            self.failed,
        )
    }
}

/// Timestamped default log filename, e.g. `fix_montage_20240315_142301.csv`.
pub fn default_log_name(prefix: &str) -> String {
    format!("{prefix}_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"))
}

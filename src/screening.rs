//! Stimulus-image batch driver.
//!
//! Enumerates gallery images, runs each through the stimulus grammar, and
//! copies it into the output directory under its canonical name. Files are
//! independent, so the per-file work fans out across the rayon pool; every
//! worker returns its log record and the driver collects them in input
//! order, so the log is deterministic and written once by the caller.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::config::ScreeningConfig;
use crate::log::{LogRecord, Outcome, RunLog};
use crate::stimulus;

/// Rename every image in `input` into `output`.
///
/// Validates the configuration first (the only fatal path besides an
/// unusable directory), ensures the output directory exists, then either
/// purges existing outputs (the id counter restarts at 0) or resumes
/// counting from however many entries are already there. Inputs are taken in
/// name order, so the counter assigns the same index to the same file on
/// every run.
pub fn rename_screening_batch(
    input: &Path,
    output: &Path,
    cfg: &ScreeningConfig,
) -> Result<RunLog> {
    cfg.validate()?;

    fs::create_dir_all(output)
        .with_context(|| format!("creating output directory {}", output.display()))?;

    let images = list_images(input, &cfg.file_extension)?;
    let start_index = prepare_output(output, cfg)?;

    let records: Vec<LogRecord> = images
        .par_iter()
        .enumerate()
        .map(|(i, path)| rename_one(path, start_index + i, output, cfg))
        .collect();

    let mut log = RunLog::new();
    log.extend(records);
    Ok(log)
}

/// Plain files in `input` whose name ends with `extension`, sorted by name.
fn list_images(input: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input)
        .with_context(|| format!("reading input directory {}", input.display()))?;
    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("reading {}", input.display()))?;
        // An entry that can no longer be inspected is not part of the batch.
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && entry.file_name().to_string_lossy().ends_with(extension) {
            images.push(entry.path());
        }
    }
    images.sort();
    Ok(images)
}

/// Apply the delete-existing policy and return the starting id index: 0
/// after a purge, otherwise the count of entries already in `output`.
fn prepare_output(output: &Path, cfg: &ScreeningConfig) -> Result<usize> {
    let entries = fs::read_dir(output)
        .with_context(|| format!("reading output directory {}", output.display()))?
        .collect::<Result<Vec<_>, io::Error>>()
        .with_context(|| format!("listing {}", output.display()))?;

    if cfg.delete_existing {
        for entry in &entries {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file {
                fs::remove_file(entry.path())
                    .with_context(|| format!("removing {}", entry.path().display()))?;
            }
        }
        Ok(0)
    } else {
        Ok(entries.len())
    }
}

/// Process one image: parse, compose, copy. Whatever happens becomes this
/// file's log record; nothing here aborts the batch.
fn rename_one(path: &Path, index: usize, output: &Path, cfg: &ScreeningConfig) -> LogRecord {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parsed = match stimulus::parse(&file_name) {
        Some(p) => p,
        None => return LogRecord::new(Outcome::Unmatched, path, None),
    };

    let new_name = parsed.canonical(index, &cfg.class_index, &cfg.file_extension);
    let dest = output.join(&new_name);

    if cfg.skip_existing && dest.exists() {
        return LogRecord::new(Outcome::SkippedExists, path, Some(dest));
    }

    match fs::copy(path, &dest) {
        Ok(_) => {
            if new_name == file_name {
                LogRecord::new(Outcome::Copied, path, Some(dest))
            } else {
                LogRecord::new(Outcome::Renamed, path, Some(dest))
            }
        }
        Err(e) => LogRecord::with_detail(Outcome::CopyFailed, path, Some(dest), e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub.jpg")).unwrap();

        let images = list_images(dir.path(), ".jpg").unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn purge_removes_files_and_resets_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("old1.jpg"), b"x").unwrap();
        fs::write(dir.path().join("old2.jpg"), b"x").unwrap();
        fs::create_dir(dir.path().join("keepdir")).unwrap();

        let cfg = ScreeningConfig::default();
        assert!(cfg.delete_existing);
        let start = prepare_output(dir.path(), &cfg).unwrap();
        assert_eq!(start, 0);
        assert!(!dir.path().join("old1.jpg").exists());
        assert!(!dir.path().join("old2.jpg").exists());
        assert!(dir.path().join("keepdir").exists());
    }

    #[test]
    fn resume_counts_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        fs::write(dir.path().join("c.jpg"), b"x").unwrap();

        let cfg = ScreeningConfig {
            delete_existing: false,
            ..ScreeningConfig::default()
        };
        let start = prepare_output(dir.path(), &cfg).unwrap();
        assert_eq!(start, 3);
        assert!(dir.path().join("a.jpg").exists());
    }
}

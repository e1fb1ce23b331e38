//! Directory-tree batch copier for the montage correction.
//!
//! ```text
//! 568/                          568_renamed/
//! ├── EXP5_movie/               ├── EXP5_movie/
//! │   ├── ROPRAI7.ncs     ──►   │   ├── RpSMAa1.ncs     per-position fix
//! │   └── …                     │   └── …
//! ├── EXP6_screening/     ──►   ├── EXP6_screening/     per-position fix
//! └── notes/              ──►   └── notes/              wholesale copy
//! ```
//!
//! The driver is strictly sequential: destination-directory creation and the
//! per-position lookups are not safe against concurrent writers to the same
//! destination. Children are visited in name order so logs and ambiguity
//! resolution are stable run to run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::MontageFixConfig;
use crate::log::{LogRecord, Outcome, RunLog};
use crate::montage::ChannelMap;

/// Destination root for a source root: same parent, name with the suffix
/// appended (`…/568` → `…/568_renamed`).
pub fn renamed_root(root: &Path, suffix: &str) -> Result<PathBuf> {
    let name = root
        .file_name()
        .with_context(|| format!("source root {} has no final path segment", root.display()))?;
    let mut renamed = name.to_os_string();
    renamed.push(suffix);
    Ok(root.with_file_name(renamed))
}

/// All entries in `dir` whose file name starts with `prefix`, sorted by name.
///
/// Pure lookup over the directory listing: zero candidates is a missing
/// source, several are an ambiguous match the caller resolves by keeping the
/// first.
pub fn find_by_prefix(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches)
}

/// Recursively copy `src` into `dest`, creating directories as needed and
/// merging into anything already present. Existing files are overwritten.
/// Returns the number of files copied.
pub fn copy_dir_merge(src: &Path, dest: &Path) -> Result<u64> {
    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("creating {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("copying {} to {}", entry.path().display(), target.display())
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Correct and copy a whole recording tree.
///
/// Validates the montage pair first (the only fatal path besides an unusable
/// root), then visits the immediate children of `root` in name order:
/// directories matching the needs-fix prefix get the per-position channel
/// correction, everything else is copied wholesale. Per-file problems are
/// recorded in the returned log and never abort the batch.
pub fn fix_montage_tree(root: &Path, cfg: &MontageFixConfig) -> Result<RunLog> {
    let map = cfg.channel_map()?;
    let dest_root = renamed_root(root, &cfg.renamed_suffix)?;

    let mut entries: Vec<_> = fs::read_dir(root)
        .with_context(|| format!("reading source root {}", root.display()))?
        .collect::<Result<Vec<_>, io::Error>>()
        .with_context(|| format!("listing {}", root.display()))?;
    entries.sort_by_key(|e| e.file_name());

    fs::create_dir_all(&dest_root)
        .with_context(|| format!("creating destination root {}", dest_root.display()))?;

    let mut log = RunLog::new();
    for entry in entries {
        let src = entry.path();
        let dest = dest_root.join(entry.file_name());
        let is_dir = match entry.file_type() {
            Ok(t) => t.is_dir(),
            // The entry vanished between listing and inspection.
            Err(e) => {
                log.push(LogRecord::with_detail(
                    Outcome::CopyFailed,
                    src,
                    Some(dest),
                    format!("inspecting source entry: {e}"),
                ));
                continue;
            }
        };

        if is_dir && !dest.exists() {
            fs::create_dir_all(&dest)
                .with_context(|| format!("creating {}", dest.display()))?;
        }

        let needs_fix = is_dir
            && entry
                .file_name()
                .to_string_lossy()
                .starts_with(&cfg.needs_fix_prefix);
        if needs_fix {
            copy_session_channels(&src, &dest, &map, cfg, &mut log)?;
        } else {
            copy_wholesale(&src, &dest, is_dir, &mut log);
        }
    }
    Ok(log)
}

/// Copy every montage position of one session directory, renaming per the
/// channel map. The skip-existing check runs before the source lookup, so a
/// resumed run never re-reads sources it already handled.
fn copy_session_channels(
    src_dir: &Path,
    dest_dir: &Path,
    map: &ChannelMap,
    cfg: &MontageFixConfig,
    log: &mut RunLog,
) -> Result<()> {
    for (err_name, corr_name) in map.pairs() {
        let expected_src = src_dir.join(format!("{}{}", err_name, cfg.channel_extension));
        let dest_file = dest_dir.join(format!("{}{}", corr_name, cfg.channel_extension));

        if cfg.skip_existing && dest_file.exists() {
            log.push(LogRecord::new(
                Outcome::SkippedExists,
                expected_src,
                Some(dest_file),
            ));
            continue;
        }

        let candidates = find_by_prefix(src_dir, err_name)?;
        if candidates.is_empty() {
            log.push(LogRecord::new(
                Outcome::MissingSource,
                expected_src,
                Some(dest_file),
            ));
            continue;
        }

        let source = &candidates[0];
        match fs::copy(source, &dest_file) {
            Ok(_) => {
                if candidates.len() > 1 {
                    log.push(LogRecord::with_detail(
                        Outcome::AmbiguousMatch,
                        source,
                        Some(dest_file),
                        format!("{} candidates matched {}*; first kept", candidates.len(), err_name),
                    ));
                } else if err_name == corr_name {
                    log.push(LogRecord::new(Outcome::Copied, source, Some(dest_file)));
                } else {
                    log.push(LogRecord::new(Outcome::Renamed, source, Some(dest_file)));
                }
            }
            Err(e) => {
                // Keep the ambiguity visible even when the copy fails.
                let detail = if candidates.len() > 1 {
                    format!(
                        "{} candidates matched {}*; copy of first failed: {}",
                        candidates.len(),
                        err_name,
                        e
                    )
                } else {
                    e.to_string()
                };
                log.push(LogRecord::with_detail(
                    Outcome::CopyFailed,
                    source,
                    Some(dest_file),
                    detail,
                ));
            }
        }
    }
    Ok(())
}

/// Copy a non-session entry as-is: recursive merge for directories, plain
/// copy for files. One record per entry; failures are logged, not raised.
fn copy_wholesale(src: &Path, dest: &Path, is_dir: bool, log: &mut RunLog) {
    let result = if is_dir {
        copy_dir_merge(src, dest).map(|_| ())
    } else {
        fs::copy(src, dest)
            .map(|_| ())
            .with_context(|| format!("copying {} to {}", src.display(), dest.display()))
    };
    match result {
        Ok(()) => log.push(LogRecord::new(Outcome::Copied, src, Some(dest.to_path_buf()))),
        Err(e) => log.push(LogRecord::with_detail(
            Outcome::CopyFailed,
            src,
            Some(dest.to_path_buf()),
            format!("{e:#}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_root_renames_the_final_segment() {
        let got = renamed_root(Path::new("/data/568"), "_renamed").unwrap();
        assert_eq!(got, Path::new("/data/568_renamed"));
        // Trailing separators do not change the segment being renamed.
        let got = renamed_root(Path::new("/data/568/"), "_renamed").unwrap();
        assert_eq!(got, Path::new("/data/568_renamed"));
    }

    #[test]
    fn renamed_root_needs_a_final_segment() {
        assert!(renamed_root(Path::new("/"), "_renamed").is_err());
    }

    #[test]
    fn find_by_prefix_is_sorted_and_exact_on_prefix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["RA1_b.ncs", "RA1.ncs", "RA2.ncs", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let hits = find_by_prefix(dir.path(), "RA1").unwrap();
        let names: Vec<_> = hits
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["RA1.ncs", "RA1_b.ncs"]);

        assert!(find_by_prefix(dir.path(), "LA1").unwrap().is_empty());
    }

    #[test]
    fn copy_dir_merge_preserves_structure_and_overwrites() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::create_dir(src.path().join("inner")).unwrap();
        fs::write(src.path().join("inner/a.txt"), b"new").unwrap();
        fs::write(src.path().join("top.txt"), b"top").unwrap();

        // Pre-existing destination content is merged over, not an error.
        let target = dest.path().join("out");
        fs::create_dir_all(target.join("inner")).unwrap();
        fs::write(target.join("inner/a.txt"), b"old").unwrap();

        let copied = copy_dir_merge(src.path(), &target).unwrap();
        assert_eq!(copied, 2);
        assert_eq!(fs::read(target.join("inner/a.txt")).unwrap(), b"new");
        assert_eq!(fs::read(target.join("top.txt")).unwrap(), b"top");
    }
}

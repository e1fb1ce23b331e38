//! # namefix — filename correction and renaming for lab data pipelines
//!
//! `namefix` repairs filenames produced by a data-collection pipeline and
//! re-encodes stimulus-image names for screening experiments: a deterministic
//! mapping from a legacy or erroneous filename (plus positional metadata) to
//! a canonical filename, applied idempotently over a batch of files with
//! collision-safe, resumable copy semantics.
//!
//! ## Engine overview
//!
//! ```text
//! source tree
//!   │
//!   ├─ matcher       parse each name against a fixed grammar
//!   │                  montage:  prefix lookup of expanded channel names
//!   │                  stimulus: base / id / class-code / suffix fields
//!   ├─ name builder  map parsed fields + batch index to the canonical name
//!   │                  montage:  positional error → correct substitution
//!   │                  stimulus: strip decorations, normalize class code
//!   └─ batch copier  copy into the destination tree, skip existing files,
//!                    record every decision in an append-only run log
//! ```
//!
//! Two batch drivers share that shape: [`fix_montage_tree`] walks a recording
//! tree sequentially and corrects channel files shifted by a phantom montage
//! entry; [`rename_screening_batch`] fans stimulus images out across a worker
//! pool. Only configuration errors are fatal — every per-file problem becomes
//! an [`Outcome`] in the returned [`RunLog`], and re-running over a partial
//! destination picks up where the last run stopped.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use namefix::{fix_montage_tree, MontageFixConfig};
//!
//! // Correct the subject-568 recording tree: 568/ → 568_renamed/
//! let cfg = MontageFixConfig::default();
//! let log = fix_montage_tree(Path::new("/data/568"), &cfg).unwrap();
//!
//! println!("{}", log.summary());
//! for rec in log.anomalies() {
//!     eprintln!("{}: {}", rec.outcome, rec.source.display());
//! }
//! log.write_csv(Path::new("fix_montage.csv")).unwrap();
//! ```
//!
//! Renaming a stimulus gallery:
//!
//! ```no_run
//! use std::path::Path;
//! use namefix::{rename_screening_batch, ScreeningConfig};
//!
//! let cfg = ScreeningConfig {
//!     delete_existing: false, // resume instead of purging
//!     ..ScreeningConfig::default()
//! };
//! let log = rename_screening_batch(
//!     Path::new("/data/gallery"),
//!     Path::new("/data/screening/images"),
//!     &cfg,
//! )
//! .unwrap();
//! println!("{}", log.summary());
//! ```

pub mod config;
pub mod copier;
pub mod log;
pub mod montage;
pub mod screening;
pub mod stimulus;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// The types and entry points a downstream user needs, without having to know
// the internal module layout.

// config
pub use config::{ConfigError, MontageFixConfig, ScreeningConfig};

// montage — tables, expansion, positional map
pub use montage::{expand, subject_568, ChannelMap, MontageEntry};

// stimulus — grammar + canonical composition
pub use stimulus::{
    normalize_class_code, parse, StimulusName, CLASS_CODE_INDEX, LEGACY_CLASS_WIDTH,
};

// copier — sequential directory-tree driver
pub use copier::{copy_dir_merge, find_by_prefix, fix_montage_tree, renamed_root};

// screening — parallel stimulus driver
pub use screening::rename_screening_batch;

// log — outcomes, records, run log
pub use log::{default_log_name, LogRecord, Outcome, RunLog, RunSummary};

//! Batch configuration.
//!
//! Each variant of the engine takes one configuration struct:
//! [`MontageFixConfig`] for the channel-rename directory-tree copy and
//! [`ScreeningConfig`] for the stimulus-image batch. All fields are `pub`
//! with documented defaults; nothing is read from process-wide state.
//!
//! Configuration-time invariant violations are the only fatal errors in the
//! crate and surface as [`ConfigError`] before any file I/O happens.

use thiserror::Error;

use crate::montage::{subject_568, ChannelMap, MontageEntry};
use crate::stimulus::{CLASS_CODE_INDEX, LEGACY_CLASS_WIDTH};

/// Fatal configuration-time error.
///
/// Everything per-file is recoverable and lands in the run log instead; see
/// [`crate::log::Outcome`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The error and correct montages expand to different channel counts, so
    /// the positional mapping is undefined.
    #[error("montage expansions differ in length: {error_len} error channels vs {correct_len} correct channels")]
    MontageLengthMismatch { error_len: usize, correct_len: usize },

    /// A legacy class-code projection index points outside the 28-digit code.
    #[error("class-code index {index} is out of range for the {width}-digit legacy code")]
    ClassIndexOutOfRange { index: usize, width: usize },
}

/// Configuration for the montage-correction directory-tree copy.
///
/// Fields are `pub`; override individual values with struct-update syntax:
///
/// ```
/// use namefix::MontageFixConfig;
///
/// let cfg = MontageFixConfig {
///     skip_existing: false,          // re-copy everything
///     channel_extension: ".ncs".into(),
///     ..MontageFixConfig::default()
/// };
/// ```
///
/// [`MontageFixConfig::default()`] is the subject-568 correction job the tool
/// was written for.
#[derive(Debug, Clone)]
pub struct MontageFixConfig {
    /// Montage actually used during recording, including the phantom channel
    /// that shifted every later file.
    pub montage_error: Vec<MontageEntry>,

    /// Montage the recording should have used. Must expand to the same number
    /// of channels as `montage_error`; validated by [`Self::channel_map`].
    pub montage_correct: Vec<MontageEntry>,

    /// Directory-name prefix marking session directories whose channel files
    /// need per-position correction. Entries not matching the prefix are
    /// copied wholesale instead.
    ///
    /// Default: `"EXP"`.
    pub needs_fix_prefix: String,

    /// Suffix appended to the source root's name to form the destination
    /// root (`568` → `568_renamed`).
    ///
    /// Default: `"_renamed"`.
    pub renamed_suffix: String,

    /// Extension of the corrected channel files written to the destination.
    ///
    /// Default: `".ncs"`.
    pub channel_extension: String,

    /// Leave destination files that already exist untouched, making repeated
    /// runs resumable without re-copying.
    ///
    /// Default: `true`.
    pub skip_existing: bool,
}

impl Default for MontageFixConfig {
    /// Returns the subject-568 job: built-in montage pair, `EXP` prefix,
    /// `_renamed` suffix, `.ncs` channels, skip-existing on.
    fn default() -> Self {
        let (montage_error, montage_correct) = subject_568();
        Self {
            montage_error,
            montage_correct,
            needs_fix_prefix: "EXP".to_string(),
            renamed_suffix: "_renamed".to_string(),
            channel_extension: ".ncs".to_string(),
            skip_existing: true,
        }
    }
}

impl MontageFixConfig {
    /// Validate the montage pair and build the positional channel map.
    ///
    /// Fails with [`ConfigError::MontageLengthMismatch`] when the two
    /// expansions differ in length. Drivers call this before touching the
    /// filesystem.
    pub fn channel_map(&self) -> Result<ChannelMap, ConfigError> {
        ChannelMap::new(&self.montage_error, &self.montage_correct)
    }
}

/// Configuration for the stimulus-image renaming batch.
///
/// ```
/// use namefix::ScreeningConfig;
///
/// let cfg = ScreeningConfig {
///     delete_existing: false,        // resume instead of purging
///     ..ScreeningConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ScreeningConfig {
    /// Positions kept when projecting a 28-digit legacy class code down to
    /// five digits, in output order.
    ///
    /// Default: `[0, 2, 15, 6, 27]` (People, Animals, Buildings, Men,
    /// Plants).
    pub class_index: Vec<usize>,

    /// Image file extension used to enumerate inputs and compose outputs.
    ///
    /// Default: `".jpg"`.
    pub file_extension: String,

    /// Leave destination files that already exist untouched.
    ///
    /// Default: `true`.
    pub skip_existing: bool,

    /// Remove every plain file in the output directory before the run and
    /// start the id counter at 0. When off, the counter resumes from the
    /// count of entries already in the output directory.
    ///
    /// Default: `true`.
    pub delete_existing: bool,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            class_index: CLASS_CODE_INDEX.to_vec(),
            file_extension: ".jpg".to_string(),
            skip_existing: true,
            delete_existing: true,
        }
    }
}

impl ScreeningConfig {
    /// Check that every projection index fits inside the legacy code width.
    ///
    /// Fails with [`ConfigError::ClassIndexOutOfRange`]; drivers call this
    /// before touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &index in &self.class_index {
            if index >= LEGACY_CLASS_WIDTH {
                return Err(ConfigError::ClassIndexOutOfRange {
                    index,
                    width: LEGACY_CLASS_WIDTH,
                });
            }
        }
        Ok(())
    }
}

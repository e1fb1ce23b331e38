//! Montage tables and channel-name expansion.
//!
//! A montage is an ordered list of (tag, count) entries. Expanding it yields
//! the flattened per-channel name sequence, and zipping the expansions of an
//! erroneous montage with the intended one gives the positional rename map:
//!
//! ```text
//! error:   PZ1 … ROPRAI6 ROPRAI7 RpSMAa1 …     (phantom channel present)
//! correct: PZ1 … ROPRAI6 RpSMAa1 RpSMAa2 …
//! ```
//!
//! Every file recorded after the phantom channel carries the data of the
//! channel one position later, so the fix is a pure positional substitution
//! over the flattened sequences. [`ChannelMap`] validates that both sides
//! expand to the same length before any mapping is handed out.

use crate::config::ConfigError;

/// One labeled electrode group: a tag and how many channels carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MontageEntry {
    pub tag: String,
    pub count: usize,
}

impl MontageEntry {
    pub fn new(tag: impl Into<String>, count: usize) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }
}

/// Flatten a montage into per-channel names: each tag repeated `count` times
/// with a 1-based index appended.
///
/// Indexing is unconditional, so `("PZ", 1)` expands to `["PZ1"]`.
pub fn expand(montage: &[MontageEntry]) -> Vec<String> {
    let total = montage.iter().map(|e| e.count).sum();
    let mut names = Vec::with_capacity(total);
    for entry in montage {
        for i in 1..=entry.count {
            names.push(format!("{}{}", entry.tag, i));
        }
    }
    names
}

/// Validated positional map from error-montage channel names to correct ones.
///
/// Position `i` of the error expansion maps to position `i` of the correct
/// expansion; the constructor rejects pairs whose expansions differ in
/// length, since the mapping would be undefined past the shorter side.
#[derive(Debug, Clone)]
pub struct ChannelMap {
    error: Vec<String>,
    correct: Vec<String>,
}

impl ChannelMap {
    pub fn new(error: &[MontageEntry], correct: &[MontageEntry]) -> Result<Self, ConfigError> {
        let error = expand(error);
        let correct = expand(correct);
        if error.len() != correct.len() {
            return Err(ConfigError::MontageLengthMismatch {
                error_len: error.len(),
                correct_len: correct.len(),
            });
        }
        Ok(Self { error, correct })
    }

    /// Number of channel positions in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.error.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.error.is_empty()
    }

    /// Error-montage name at position `i`.
    pub fn error_name(&self, i: usize) -> Option<&str> {
        self.error.get(i).map(String::as_str)
    }

    /// Correct-montage name at position `i`.
    pub fn correct_name(&self, i: usize) -> Option<&str> {
        self.correct.get(i).map(String::as_str)
    }

    /// Iterate `(error_name, correct_name)` pairs in montage order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.error
            .iter()
            .map(String::as_str)
            .zip(self.correct.iter().map(String::as_str))
    }
}

/// The montage pair behind the original subject-568 correction job.
///
/// A phantom seventh ROPRAI electrode was listed in the recording montage:
/// every file recorded after `ROPRAI6` carries the data of the next channel
/// over, and the final error-named file corresponds to no channel at all.
/// The error table below stops one entry short (`LpSMA 6`) so that both
/// sides expand to the same 110 positions and the surplus trailing file is
/// never touched.
pub fn subject_568() -> (Vec<MontageEntry>, Vec<MontageEntry>) {
    fn table(entries: &[(&str, usize)]) -> Vec<MontageEntry> {
        entries
            .iter()
            .map(|&(tag, count)| MontageEntry::new(tag, count))
            .collect()
    }

    // PZ first: identical on both sides, so its file keeps its name.
    let error = table(&[
        ("PZ", 1),
        ("RMH", 8),
        ("RA", 9),
        ("RAC", 8),
        ("ROF", 8),
        ("ROPRAI", 7), // phantom seventh electrode
        ("RpSMAa", 7),
        ("RpSMAp", 7),
        ("RMF", 8),
        ("LA", 9),
        ("LAH", 8),
        ("LAC", 9),
        ("LOF", 8),
        ("LAI", 7),
        ("LpSMA", 6),
    ]);
    let correct = table(&[
        ("PZ", 1),
        ("RMH", 8),
        ("RA", 9),
        ("RAC", 8),
        ("ROF", 8),
        ("ROPRAI", 6),
        ("RpSMAa", 7),
        ("RpSMAp", 7),
        ("RMF", 8),
        ("LA", 9),
        ("LAH", 8),
        ("LAC", 9),
        ("LOF", 8),
        ("LAI", 7),
        ("LpSMA", 7),
    ]);
    (error, correct)
}

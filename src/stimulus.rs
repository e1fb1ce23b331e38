//! Stimulus-image filename grammar and canonical name composition.
//!
//! Screening-gallery images arrive named by hand, with take numbers, embedded
//! extensions, and inconsistent text markers:
//!
//! ```text
//! ayers_rock_text2_001_id004158_0100000000000010100000000010.jpg
//! └─ base ─────────────┘ └─ id ─┘ └─ 28-digit legacy class code ┘
//! ```
//!
//! [`parse`] splits a name into its grammar fields; [`StimulusName`] then
//! normalizes the base (decorations stripped, underscores to hyphens),
//! detects the iconic-text flag, normalizes the class code by width, and
//! composes the canonical form:
//!
//! ```text
//! ayers-rock_text_id000005_00000.jpg
//! ```
//!
//! Everything here is a pure function of the input name plus the
//! driver-supplied index; no I/O.

use once_cell::sync::Lazy;
use regex::Regex;

/// Width of the legacy class-code format.
pub const LEGACY_CLASS_WIDTH: usize = 28;

/// Positions kept when projecting a legacy class code, in output order:
/// People, Animals, Buildings, Men, Plants.
pub const CLASS_CODE_INDEX: [usize; 5] = [0, 2, 15, 6, 27];

/// Full filename grammar: base, id token, class code (legacy width matched
/// in preference to the newer 5–6 digit form), optional suffix, extension.
static STIMULUS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\w.'&()\[\]\u{300}-\u{36F}-]*)_(i?d\d{6,24})_(\d{28}|\d{5,6})(.*)\.jpg")
        .unwrap()
});

/// `text`/`txt` marker immediately followed (after an optional underscore)
/// by a digit.
static TEXT_MARK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"te?xt_?\d").unwrap());

/// Trailing take-number fragment: `_` + three digits and everything after.
static TRAILING_SEQ_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_\d{3}.*").unwrap());

/// Embedded extension fragment left over from an earlier rename.
static EMBEDDED_EXT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_?\.jpg.*").unwrap());

/// Trailing text/txt marker fragment.
static TEXT_FRAGMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_te?xt.*").unwrap());

/// Parsed stimulus filename, fields exactly as captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StimulusName {
    /// Leading free-text identifier, decorations still attached.
    pub base: String,
    /// Original id token (`id`/`d` + 6–24 digits). Parsed for the record;
    /// canonical names take their id from the batch counter instead.
    pub id_code: String,
    /// Binary class code: 5–6 digits (newer format) or 28 (legacy).
    pub class_code: String,
    /// Whatever sat between the class code and the extension.
    pub suffix: String,
}

/// Parse an image filename against the stimulus grammar.
///
/// Returns `None` when the name does not follow the grammar; batch drivers
/// record those as unmatched and move on.
pub fn parse(file_name: &str) -> Option<StimulusName> {
    let caps = STIMULUS_REGEX.captures(file_name)?;
    Some(StimulusName {
        base: caps[1].to_string(),
        id_code: caps[2].to_string(),
        class_code: caps[3].to_string(),
        suffix: caps[4].to_string(),
    })
}

impl StimulusName {
    /// Whether this stimulus is an iconic-text variant.
    ///
    /// True when the base carries a `text`/`txt` marker immediately followed
    /// by a digit, when the trailing suffix token is exactly `_text`, or when
    /// the base itself ends in `_text` — the form canonical names use, which
    /// keeps the flag stable when a canonical name is parsed again.
    pub fn text_variant(&self) -> bool {
        TEXT_MARK_REGEX.is_match(&self.base)
            || self.suffix == "_text"
            || self.base.ends_with("_text")
    }

    /// Base with take-number, embedded-extension, and text-marker fragments
    /// stripped, then underscores replaced by hyphens.
    pub fn normalized_base(&self) -> String {
        let base = TRAILING_SEQ_REGEX.replace(&self.base, "");
        let base = EMBEDDED_EXT_REGEX.replace(&base, "");
        let base = TEXT_FRAGMENT_REGEX.replace(&base, "");
        base.replace('_', "-")
    }

    /// Compose the canonical filename for this stimulus.
    ///
    /// `index` is the batch driver's monotonically increasing counter; the
    /// original id code is never reused. The result is a pure function of the
    /// record and the index, so re-runs with the same index sequence
    /// reproduce identical names.
    pub fn canonical(&self, index: usize, class_index: &[usize], extension: &str) -> String {
        let text = if self.text_variant() { "_text" } else { "" };
        format!(
            "{}{}_id{:06}_{}{}",
            self.normalized_base(),
            text,
            index,
            normalize_class_code(&self.class_code, class_index),
            extension,
        )
    }
}

/// Normalize a class code by width.
///
/// A 28-digit legacy code is projected down to the characters at
/// `class_index`. A code shorter than six digits gains a `0` at position 4,
/// the slot of the category added after those images were coded. Anything
/// else is kept as-is.
pub fn normalize_class_code(code: &str, class_index: &[usize]) -> String {
    if code.len() == LEGACY_CLASS_WIDTH {
        let chars: Vec<char> = code.chars().collect();
        class_index.iter().filter_map(|&i| chars.get(i)).collect()
    } else if code.len() < 6 {
        let split = code.len().min(4);
        format!("{}0{}", &code[..split], &code[split..])
    } else {
        code.to_string()
    }
}

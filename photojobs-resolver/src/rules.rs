//! Individual match rules of the resolution cascade.
//!
//! Rules never touch the filesystem: they filter a candidate list handed to
//! them by the [`Resolver`](crate::Resolver), which makes each one testable on
//! plain path slices.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use photojobs_core::PersonHint;
use regex::Regex;

/// A reference to resolve, pre-split into the pieces the rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nominal {
    /// The reference exactly as given.
    pub raw: String,
    /// Filename without extension.
    pub stem: String,
    pub hint: Option<PersonHint>,
}

impl Nominal {
    /// `None` for blank references.
    pub fn new(raw: &str, hint: Option<PersonHint>) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let stem = file_stem(Path::new(raw))?;
        Some(Self {
            raw: raw.to_string(),
            stem,
            hint,
        })
    }
}

/// Which rule produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Stem equals the nominal stem or extends it with `_…`.
    Stem,
    /// Camera number tail embedded in an already-renamed file.
    CameraTail,
    /// Every shot for the person prefix of a synthesized name.
    PersonPrefix,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Stem => write!(f, "stem"),
            RuleKind::CameraTail => write!(f, "camera-tail"),
            RuleKind::PersonPrefix => write!(f, "person-prefix"),
        }
    }
}

/// One step of the cascade.
pub trait MatchRule {
    fn kind(&self) -> RuleKind;

    /// Filter `candidates` down to the files this rule accepts.
    ///
    /// Returns `None` when the rule does not apply to `nominal` or accepts
    /// nothing; `Some` is never empty. Input order is preserved.
    fn try_match(&self, nominal: &Nominal, candidates: &[PathBuf]) -> Option<Vec<PathBuf>>;
}

/// The fixed cascade order.
pub fn default_rules() -> Vec<Box<dyn MatchRule>> {
    vec![
        Box::new(StemRule),
        Box::new(CameraTailRule),
        Box::new(PersonPrefixRule),
    ]
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// `stem == nominal` or `stem` starts with `nominal_` (`_1`, `_2` shot variants).
#[derive(Debug, Clone, Copy, Default)]
pub struct StemRule;

impl MatchRule for StemRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Stem
    }

    fn try_match(&self, nominal: &Nominal, candidates: &[PathBuf]) -> Option<Vec<PathBuf>> {
        let prefix = format!("{}_", nominal.stem);
        filter_stems(candidates, |stem| {
            stem == nominal.stem || stem.starts_with(&prefix)
        })
    }
}

/// Recover camera references (`JS106537`) whose files were already renamed to
/// a person scheme (`Allen_Brielle_6537_3`).
///
/// Without a person hint any file carrying the same 4-digit tail matches, so
/// two people sharing a tail are indistinguishable. With a hint, the stem must
/// also start with `last_first_` or `first_last_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraTailRule;

impl CameraTailRule {
    /// Last four digits of a `letters+digits` stem with at least 4 digits.
    pub fn tail(stem: &str) -> Option<&str> {
        static CAMERA: OnceLock<Regex> = OnceLock::new();
        let camera =
            CAMERA.get_or_init(|| Regex::new(r"^[A-Za-z]+([0-9]+)$").expect("static regex"));
        let digits = camera.captures(stem)?.get(1)?.as_str();
        (digits.len() >= 4).then(|| &digits[digits.len() - 4..])
    }
}

impl MatchRule for CameraTailRule {
    fn kind(&self) -> RuleKind {
        RuleKind::CameraTail
    }

    fn try_match(&self, nominal: &Nominal, candidates: &[PathBuf]) -> Option<Vec<PathBuf>> {
        let tail = Self::tail(&nominal.stem)?;
        let ends = format!("_{tail}");
        let inner = format!("_{tail}_");
        filter_stems(candidates, |stem| {
            let carries_tail = stem == tail || stem.ends_with(&ends) || stem.contains(&inner);
            carries_tail && nominal.hint.as_ref().map_or(true, |h| h.admits(stem))
        })
    }
}

/// Strip a trailing `_<digits>` and accept every stem under that prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonPrefixRule;

impl PersonPrefixRule {
    pub fn prefix(stem: &str) -> Option<&str> {
        static NUMBERED: OnceLock<Regex> = OnceLock::new();
        let numbered =
            NUMBERED.get_or_init(|| Regex::new(r"^(.+)_[0-9]+$").expect("static regex"));
        numbered.captures(stem)?.get(1).map(|m| m.as_str())
    }
}

impl MatchRule for PersonPrefixRule {
    fn kind(&self) -> RuleKind {
        RuleKind::PersonPrefix
    }

    fn try_match(&self, nominal: &Nominal, candidates: &[PathBuf]) -> Option<Vec<PathBuf>> {
        let prefix = format!("{}_", Self::prefix(&nominal.stem)?);
        filter_stems(candidates, |stem| stem.starts_with(&prefix))
    }
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

pub(crate) fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

fn filter_stems(candidates: &[PathBuf], accept: impl Fn(&str) -> bool) -> Option<Vec<PathBuf>> {
    let hits: Vec<PathBuf> = candidates
        .iter()
        .filter(|p| file_stem(p).is_some_and(|s| accept(&s)))
        .cloned()
        .collect();
    (!hits.is_empty()).then_some(hits)
}

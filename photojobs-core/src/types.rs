//! Domain types shared by every PhotoJobs workflow.
//!
//! Free-text fields are stored exactly as read; sanitizing happens only when a
//! value becomes part of a filename (see [`crate::naming`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize;

/// Ordered passthrough columns (header, value) not interpreted by the engine.
pub type Columns = Vec<(String, String)>;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A 4-digit, zero-padded photo sequence number (`FILENUMBER`).
///
/// Equal-length digit strings order lexically the same as numerically, so the
/// derived `Ord` is the numeric order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(pub String);

impl Sequence {
    /// Placeholder for references that carry no digit run of length 4+.
    pub const MISSING: &'static str = "0000";

    /// Last four digits of the *first* run of 4+ digits in `stem`.
    ///
    /// Used when expanding camera references (`JS106537` -> `6537`).
    pub fn from_reference(stem: &str) -> Option<Self> {
        digit_runs(stem)
            .into_iter()
            .find(|run| run.len() >= 4)
            .map(|run| Self(run[run.len() - 4..].to_string()))
    }

    /// Last four digits of the *last* run of 4+ digits in `stem`.
    ///
    /// Used on synthesized names, where trailing tokens such as `_3` or a
    /// player number precede or follow the sequence
    /// (`Smith_John_TeamA_42_1234_5` -> `1234`).
    pub fn last_in(stem: &str) -> Option<Self> {
        digit_runs(stem)
            .into_iter()
            .rev()
            .find(|run| run.len() >= 4)
            .map(|run| Self(run[run.len() - 4..].to_string()))
    }

    /// Accepts only exactly four ASCII digits.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        (value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()))
            .then(|| Self(value.to_string()))
    }

    pub fn missing() -> Self {
        Self(Self::MISSING.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn digit_runs(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .collect()
}

/// Camera/setup identifier derived from a camera-export filename.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub String);

impl BatchId {
    pub const UNKNOWN: &'static str = "UNKNOWN";

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for BatchId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for BatchId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Deliverable formats produced for every photo reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Jpg,
    Png,
}

impl Variant {
    /// Fan-out order used by the expander.
    pub const ALL: [Variant; 2] = [Variant::Jpg, Variant::Png];

    pub fn extension(self) -> &'static str {
        match self {
            Variant::Jpg => ".jpg",
            Variant::Png => ".png",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Jpg => write!(f, "jpg"),
            Variant::Png => write!(f, "png"),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One roster row with the columns the engine understands pulled out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterRecord {
    pub last_name: String,
    pub first_name: String,
    pub team_name: String,
    pub grade: String,
    pub number: String,
    /// Raw, still-delimited photo reference list.
    pub photos: String,
    /// Every other column, in source order.
    pub extra: Columns,
}

impl RosterRecord {
    /// `"First Last"`, trimmed; empty when both names are empty.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn extra(&self, header: &str) -> Option<&str> {
        lookup(&self.extra, header)
    }

    pub fn person_hint(&self) -> Option<PersonHint> {
        PersonHint::new(&self.first_name, &self.last_name)
    }
}

/// One (roster row, photo reference, variant) expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub last_name: String,
    pub first_name: String,
    pub team_name: String,
    pub grade: String,
    pub number: String,
    /// `FILENUMBER`.
    pub file_number: Sequence,
    /// `BATCH`.
    pub batch: BatchId,
    /// `PHOTO` — the reference exactly as it appeared in the roster.
    pub photo: String,
    /// `SPA` / `NEWFILENAME`.
    pub spa: String,
    pub extra: Columns,
}

impl OutputRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn extra(&self, header: &str) -> Option<&str> {
        lookup(&self.extra, header)
    }

    pub fn person_hint(&self) -> Option<PersonHint> {
        PersonHint::new(&self.first_name, &self.last_name)
    }

    /// Fill an empty `TEAMNAME`; a populated team is left alone.
    ///
    /// Returns whether the record changed.
    pub fn backfill_team(&mut self, team: &str) -> bool {
        if !self.team_name.trim().is_empty() {
            return false;
        }
        self.team_name = team.to_string();
        true
    }
}

fn lookup<'a>(columns: &'a Columns, header: &str) -> Option<&'a str> {
    columns
        .iter()
        .find(|(h, _)| h == header)
        .map(|(_, v)| v.as_str())
}

/// Sanitized first/last names used to gate numeric-tail matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonHint {
    pub first: String,
    pub last: String,
}

impl PersonHint {
    /// `None` unless both names survive sanitizing.
    pub fn new(first: &str, last: &str) -> Option<Self> {
        let first = sanitize(first).to_lowercase();
        let last = sanitize(last).to_lowercase();
        if first.is_empty() || last.is_empty() {
            return None;
        }
        Some(Self { first, last })
    }

    /// The two conventional orderings: `last_first_` and `first_last_`.
    pub fn prefixes(&self) -> [String; 2] {
        [
            format!("{}_{}_", self.last, self.first),
            format!("{}_{}_", self.first, self.last),
        ]
    }

    /// Case-insensitive check that `stem` starts with either ordering.
    pub fn admits(&self, stem: &str) -> bool {
        let stem = stem.to_lowercase();
        self.prefixes().iter().any(|p| stem.starts_with(p.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Output filename synthesis.
//!
//! Token order is fixed: last, first, team, number, grade, sequence. The
//! resolver's person-prefix rule depends on this order, so it must not vary.

use crate::sanitize::sanitize;
use crate::types::{RosterRecord, Sequence};

/// Build the canonical filename (`SPA`) for one photo variant.
///
/// Optional fields are omitted when they sanitize to nothing. `batch_suffix`
/// is appended verbatim right before `extension`.
pub fn construct_name(
    record: &RosterRecord,
    sequence: &Sequence,
    extension: &str,
    batch_suffix: Option<&str>,
) -> String {
    let mut parts = vec![sanitize(&record.last_name), sanitize(&record.first_name)];
    for optional in [&record.team_name, &record.number, &record.grade] {
        let token = sanitize(optional);
        if !token.is_empty() {
            parts.push(token);
        }
    }
    parts.push(sequence.as_str().to_string());

    let mut name = parts.join("_");
    if let Some(suffix) = batch_suffix {
        name.push_str(suffix);
    }
    name.push_str(extension);
    name
}

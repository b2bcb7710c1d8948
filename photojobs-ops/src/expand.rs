//! Mapping expansion: roster rows to per-photo records, records to a rename
//! multimap.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use photojobs_core::{
    classify_batch, construct_name, split_photo_refs, BatchSuffixes, OutputRecord, RosterRecord,
    Sequence, Variant,
};

use crate::summary::ItemOutcome;

/// Why a single roster row produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("no photo references")]
    NoPhotoReferences,
}

/// Expand one roster row into two records (`.jpg`, `.png`) per reference.
///
/// Both variants of a reference share `FILENUMBER` and `BATCH`. A reference
/// with no run of four digits gets sequence `0000`.
pub fn expand(
    record: &RosterRecord,
    refs: &[String],
    suffixes: &BatchSuffixes,
) -> Result<Vec<OutputRecord>, ExpandError> {
    if refs.is_empty() {
        return Err(ExpandError::NoPhotoReferences);
    }

    let mut out = Vec::with_capacity(refs.len() * Variant::ALL.len());
    for reference in refs {
        let stem = Path::new(reference)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| reference.clone());
        let sequence = Sequence::from_reference(&stem).unwrap_or_else(|| {
            tracing::warn!(
                "no 4-digit sequence in '{reference}' for {}; using {}",
                record.display_name(),
                Sequence::MISSING
            );
            Sequence::missing()
        });
        let batch = classify_batch(reference);
        let suffix = suffixes.get(&batch).map(String::as_str);

        for variant in Variant::ALL {
            out.push(OutputRecord {
                last_name: record.last_name.clone(),
                first_name: record.first_name.clone(),
                team_name: record.team_name.clone(),
                grade: record.grade.clone(),
                number: record.number.clone(),
                file_number: sequence.clone(),
                batch: batch.clone(),
                photo: reference.clone(),
                spa: construct_name(record, &sequence, variant.extension(), suffix),
                extra: record.extra.clone(),
            });
        }
    }
    Ok(out)
}

/// Every roster row expanded, plus one failure per row that had nothing to
/// expand.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub records: Vec<OutputRecord>,
    pub skipped: Vec<ItemOutcome>,
}

pub fn expand_all(records: &[RosterRecord], suffixes: &BatchSuffixes) -> Expansion {
    let mut expansion = Expansion::default();
    for (i, record) in records.iter().enumerate() {
        let refs = split_photo_refs(&record.photos);
        match expand(record, &refs, suffixes) {
            Ok(mut rows) => expansion.records.append(&mut rows),
            Err(err) => {
                let who = match record.display_name() {
                    name if name.is_empty() => format!("row {}", i + 2),
                    name => name,
                };
                tracing::warn!("skipping {who}: {err}");
                expansion.skipped.push(ItemOutcome::failed(who, err));
            }
        }
    }
    expansion
}

// ---------------------------------------------------------------------------
// RenameMapping
// ---------------------------------------------------------------------------

/// Source name to destination names, both in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMapping {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl RenameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `destination` under `source`; repeats and blank values are ignored.
    pub fn insert(&mut self, source: &str, destination: &str) {
        let (source, destination) = (source.trim(), destination.trim());
        if source.is_empty() || destination.is_empty() {
            return;
        }
        let slot = match self.index.get(source) {
            Some(&i) => i,
            None => {
                self.entries.push((source.to_string(), Vec::new()));
                self.index.insert(source.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let destinations = &mut self.entries[slot].1;
        if !destinations.iter().any(|d| d == destination) {
            destinations.push(destination.to_string());
        }
    }

    pub fn get(&self, source: &str) -> Option<&[String]> {
        self.index
            .get(source)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(s, d)| (s.as_str(), d.as_slice()))
    }

    /// Number of distinct sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn destination_count(&self) -> usize {
        self.entries.iter().map(|(_, d)| d.len()).sum()
    }
}

impl<S: AsRef<str>, D: AsRef<str>> FromIterator<(S, D)> for RenameMapping {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (source, destination) in iter {
            mapping.insert(source.as_ref(), destination.as_ref());
        }
        mapping
    }
}

/// Key `rows` by `PHOTO`, collecting every distinct `SPA`.
pub fn build_rename_mapping(rows: &[OutputRecord]) -> RenameMapping {
    rows.iter()
        .map(|r| (r.photo.as_str(), r.spa.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use photojobs_core::BatchId;
    use rstest::rstest;

    fn brielle(photos: &str) -> RosterRecord {
        RosterRecord {
            last_name: "Allen".into(),
            first_name: "Brielle".into(),
            team_name: "Falcons".into(),
            number: "42".into(),
            photos: photos.into(),
            ..Default::default()
        }
    }

    #[test]
    fn three_references_make_six_records() {
        let record = brielle("JS106537.jpg, JS106538.jpg;JS206539.jpg");
        let refs = split_photo_refs(&record.photos);
        let rows = expand(&record, &refs, &BatchSuffixes::new()).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].spa, "Allen_Brielle_Falcons_42_6537.jpg");
        assert_eq!(rows[1].spa, "Allen_Brielle_Falcons_42_6537.png");
        assert_eq!(rows[0].file_number, rows[1].file_number);
        assert_eq!(rows[4].batch, BatchId::from("JS20"));
        assert_eq!(rows[5].photo, "JS206539.jpg");
    }

    #[test]
    fn batch_suffix_lands_before_extension() {
        let mut suffixes = BatchSuffixes::new();
        suffixes.insert(BatchId::from("JS10"), "_B".into());
        let rows = expand(&brielle(""), &["JS106537.jpg".into()], &suffixes).unwrap();
        assert_eq!(rows[0].spa, "Allen_Brielle_Falcons_42_6537_B.jpg");
    }

    #[test]
    fn reference_without_digits_gets_placeholder_sequence() {
        let rows = expand(&brielle(""), &["portrait.jpg".into()], &BatchSuffixes::new()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].file_number.as_str(), "0000");
        assert!(rows[0].batch.is_unknown());
    }

    #[rstest]
    #[case("1234, ???, 5678", 1)]
    #[case("???, JS106537.jpg, JS106538.jpg", 0)]
    #[case("JS106537.jpg; JS106538.jpg; portrait", 2)]
    fn malformed_reference_keeps_fan_out_at_six(#[case] photos: &str, #[case] malformed: usize) {
        let record = brielle(photos);
        let refs = split_photo_refs(&record.photos);
        assert_eq!(refs.len(), 3);

        let rows = expand(&record, &refs, &BatchSuffixes::new()).unwrap();
        assert_eq!(rows.len(), 6);
        for (i, row) in rows.iter().enumerate() {
            let is_placeholder = row.file_number.as_str() == Sequence::MISSING;
            assert_eq!(is_placeholder, i / 2 == malformed, "row {i}: {}", row.spa);
        }
    }

    #[test]
    fn empty_reference_list_is_skipped_and_reported() {
        let expansion = expand_all(&[brielle("  "), brielle("JS106537.jpg")], &BatchSuffixes::new());
        assert_eq!(expansion.records.len(), 2);
        assert_eq!(expansion.skipped.len(), 1);
        assert!(expansion.skipped[0].to_string().contains("Brielle Allen"));
    }

    #[test]
    fn mapping_keeps_first_appearance_order_and_dedupes() {
        let record = brielle("JS106537.jpg JS106538.jpg");
        let refs = split_photo_refs(&record.photos);
        let mut rows = expand(&record, &refs, &BatchSuffixes::new()).unwrap();
        rows.push(rows[0].clone());

        let mapping = build_rename_mapping(&rows);
        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.get("JS106537.jpg").unwrap(),
            &[
                "Allen_Brielle_Falcons_42_6537.jpg".to_string(),
                "Allen_Brielle_Falcons_42_6537.png".to_string()
            ]
        );
        assert_eq!(mapping.destination_count(), 4);
        let sources: Vec<&str> = mapping.iter().map(|(s, _)| s).collect();
        assert_eq!(sources, vec!["JS106537.jpg", "JS106538.jpg"]);
    }
}

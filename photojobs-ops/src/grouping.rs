//! Grouping by person (or person and team) and first-photo selection.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use photojobs_core::{GroupBy, OutputRecord};

/// `(last, first)` or `(last, first, team)`; orders groups deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub last_name: String,
    pub first_name: String,
    pub team_name: Option<String>,
}

impl GroupKey {
    pub fn of(record: &OutputRecord, by: GroupBy) -> Self {
        Self {
            last_name: record.last_name.trim().to_string(),
            first_name: record.first_name.trim().to_string(),
            team_name: match by {
                GroupBy::Person => None,
                GroupBy::PersonTeam => Some(record.team_name.trim().to_string()),
            },
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)?;
        if let Some(team) = &self.team_name {
            write!(f, " [{team}]")?;
        }
        Ok(())
    }
}

/// Records bucketed by key; each bucket keeps input order.
pub fn group_records(
    records: impl IntoIterator<Item = OutputRecord>,
    by: GroupBy,
) -> BTreeMap<GroupKey, Vec<OutputRecord>> {
    let mut groups: BTreeMap<GroupKey, Vec<OutputRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(GroupKey::of(&record, by))
            .or_default()
            .push(record);
    }
    groups
}

/// The representative chosen for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub record: OutputRecord,
    /// The resolved file for `record`.
    pub source: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub selected: BTreeMap<GroupKey, Selected>,
    /// Groups in which no record resolved.
    pub unresolved: Vec<GroupKey>,
}

/// Pick one record per group.
///
/// Candidates are stably sorted by sequence string, so equal sequences keep
/// input order; the first whose `locate` succeeds represents the group.
pub fn group_and_select<F>(
    records: impl IntoIterator<Item = OutputRecord>,
    by: GroupBy,
    mut locate: F,
) -> Selection
where
    F: FnMut(&OutputRecord) -> Option<PathBuf>,
{
    let mut selection = Selection::default();
    for (key, mut members) in group_records(records, by) {
        members.sort_by(|a, b| a.file_number.cmp(&b.file_number));
        let found = members
            .into_iter()
            .find_map(|record| locate(&record).map(|source| Selected { record, source }));
        match found {
            Some(chosen) => {
                tracing::debug!(
                    "{key}: selected {} (seq {})",
                    chosen.source.display(),
                    chosen.record.file_number
                );
                selection.selected.insert(key, chosen);
            }
            None => {
                tracing::warn!("{key}: no photo found");
                selection.unresolved.push(key);
            }
        }
    }
    selection
}

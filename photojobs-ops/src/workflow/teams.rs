//! Sort one photo per person into team folders.
//!
//! A run moves through these stages once each, in order:
//!
//! 1. read the derived table
//! 2. if it spans several batches, ask which to keep
//! 3. if anyone lacks a team, ask for one default team
//! 4. group, resolve, and pick each group's first photo
//! 5. copy the pick to `<out>/<team>/<file>` and verify the copy
//!
//! Steps 2 and 3 go through an [`AmbiguityResolver`] and are the only places
//! a run can wait on an answer.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use photojobs_core::{classify_batch, BatchId, GroupBy, OutputRecord, Sequence, Table};
use photojobs_resolver::Resolver;

use crate::ambiguity::AmbiguityResolver;
use crate::apply::{copy_verified, destination_path, sibling_dir};
use crate::error::{io_err, OpsError};
use crate::grouping::group_and_select;
use crate::summary::{ItemOutcome, RunSummary};

use super::{require_dir, require_file};

pub const OUTPUT_SUFFIX: &str = "_TeamIndSorted";

#[derive(Debug, Clone)]
pub struct TeamsOptions {
    pub csv: PathBuf,
    pub root: PathBuf,
    /// Column holding the team; `TEAMNAME` in derived tables.
    pub team_field: String,
    /// Defaults to `<root>_TeamIndSorted`.
    pub out_dir: Option<PathBuf>,
    pub group_by: GroupBy,
}

#[derive(Debug, Default)]
pub struct TeamsReport {
    pub out_dir: PathBuf,
    /// Present only when the table spanned several batches.
    pub batches_kept: Option<Vec<BatchId>>,
    /// People that received the default team.
    pub defaulted: Vec<String>,
    pub default_team: Option<String>,
    /// Groups with no photo on disk.
    pub without_photos: Vec<String>,
    /// Photos copied per team folder.
    pub team_counts: BTreeMap<String, usize>,
    /// Rows dropped while reading.
    pub warnings: Vec<String>,
    pub items: Vec<ItemOutcome>,
    pub summary: RunSummary,
}

pub fn run(
    opts: &TeamsOptions,
    answers: &mut dyn AmbiguityResolver,
) -> Result<TeamsReport, OpsError> {
    require_file(&opts.csv)?;
    require_dir(&opts.root)?;
    let mut report = TeamsReport {
        out_dir: opts
            .out_dir
            .clone()
            .unwrap_or_else(|| sibling_dir(&opts.root, OUTPUT_SUFFIX)),
        ..Default::default()
    };

    // Read
    let table = Table::read(&opts.csv)?;
    let mut records = read_records(&table, &opts.team_field, &mut report.warnings)?;
    if records.is_empty() {
        return Err(OpsError::Empty {
            path: opts.csv.clone(),
            what: "person records",
        });
    }

    // Batch filter
    let mut batch_counts: BTreeMap<BatchId, usize> = BTreeMap::new();
    for record in &records {
        *batch_counts.entry(record.batch.clone()).or_default() += 1;
    }
    if batch_counts.len() > 1 {
        let available: Vec<(BatchId, usize)> = batch_counts.into_iter().collect();
        let keep = answers.select_batches(&available)?;
        records.retain(|r| keep.contains(&r.batch));
        tracing::info!("kept {} record(s) in batches {:?}", records.len(), keep);
        if records.is_empty() {
            return Err(OpsError::Empty {
                path: opts.csv.clone(),
                what: "records in the selected batches",
            });
        }
        report.batches_kept = Some(keep);
    }

    // Default team
    let needing_team: BTreeSet<String> = records
        .iter()
        .filter(|r| r.team_name.trim().is_empty())
        .map(OutputRecord::display_name)
        .collect();
    if !needing_team.is_empty() {
        let people: Vec<String> = needing_team.into_iter().collect();
        let team = answers.default_team(&people)?;
        for record in &mut records {
            record.backfill_team(&team);
        }
        tracing::info!("assigned '{team}' to {} people", people.len());
        report.defaulted = people;
        report.default_team = Some(team);
    }

    // Group + resolve
    let resolver = Resolver::new(&opts.root)?;
    let selection = group_and_select(records, opts.group_by, |record| {
        locate_record(&resolver, record)
    });
    report.without_photos = selection
        .unresolved
        .iter()
        .map(ToString::to_string)
        .collect();
    for key in &selection.unresolved {
        report
            .items
            .push(ItemOutcome::missing(key.to_string(), "no photo found"));
    }

    // Copy + verify
    std::fs::create_dir_all(&report.out_dir).map_err(|e| io_err(&report.out_dir, e))?;
    let mut taken: HashMap<PathBuf, String> = HashMap::new();
    for (key, chosen) in &selection.selected {
        let Some(team) = team_folder(&chosen.record.team_name) else {
            report.items.push(ItemOutcome::failed(
                key.to_string(),
                format!("team '{}' is not a usable folder name", chosen.record.team_name),
            ));
            continue;
        };
        let Some(file_name) = chosen.source.file_name() else {
            continue;
        };
        let team_dir = report.out_dir.join(&team);
        let mut target = team_dir.join(file_name);
        if taken.contains_key(&target) {
            // Same camera file name from another folder: fall back to the SPA name.
            target = destination_path(&team_dir, &chosen.record.spa, &chosen.source);
        }
        if let Some(owner) = taken.get(&target) {
            report.items.push(ItemOutcome::failed(
                key.to_string(),
                format!("{} already written for {owner}", target.display()),
            ));
            continue;
        }
        taken.insert(target.clone(), key.to_string());
        match copy_verified(&chosen.source, &target) {
            Ok(()) => {
                *report.team_counts.entry(team).or_default() += 1;
                report.items.push(ItemOutcome::Written {
                    source: chosen.source.clone(),
                    destination: target,
                });
            }
            Err(err) => report.items.push(ItemOutcome::failed(key.to_string(), err)),
        }
    }

    report.summary = RunSummary::from_outcomes(&report.items);
    Ok(report)
}

/// Lift table rows into records, skipping (with a warning) rows without a
/// name, an SPA, or any usable sequence.
fn read_records(
    table: &Table,
    team_field: &str,
    warnings: &mut Vec<String>,
) -> Result<Vec<OutputRecord>, OpsError> {
    table.require(&["LASTNAME", "FIRSTNAME", "SPA", team_field])?;
    let col = |name: &str| table.column(name);
    let (Some(last), Some(first), Some(spa), Some(team)) =
        (col("LASTNAME"), col("FIRSTNAME"), col("SPA"), col(team_field))
    else {
        return Err(table
            .missing_columns(&["LASTNAME", "FIRSTNAME", "SPA", team_field])
            .into());
    };
    let (file_number, batch, photo) = (col("FILENUMBER"), col("BATCH"), col("PHOTO"));
    let (grade, number) = (col("GRADE"), col("NUMBER"));
    let cell = |row: &[String], idx: Option<usize>| -> String {
        idx.map(|i| row[i].trim().to_string()).unwrap_or_default()
    };

    let mut records = Vec::new();
    for (i, row) in table.rows.iter().enumerate() {
        let row = row.as_slice();
        let line = i + 2;
        let (last_name, first_name) = (cell(row, Some(last)), cell(row, Some(first)));
        let spa_value = cell(row, Some(spa));
        if last_name.is_empty() || first_name.is_empty() || spa_value.is_empty() {
            let msg = format!("row {line}: missing name or SPA, skipped");
            tracing::warn!("{msg}");
            warnings.push(msg);
            continue;
        }

        let spa_stem = Path::new(&spa_value)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(sequence) =
            Sequence::parse(&cell(row, file_number)).or_else(|| Sequence::last_in(&spa_stem))
        else {
            let msg = format!("row {line}: no sequence number in '{spa_value}', skipped");
            tracing::warn!("{msg}");
            warnings.push(msg);
            continue;
        };

        let photo_value = match cell(row, photo) {
            p if p.is_empty() => spa_value.clone(),
            p => p,
        };
        let batch_value = match cell(row, batch) {
            b if b.is_empty() => classify_batch(&photo_value),
            b => BatchId::from(b),
        };

        records.push(OutputRecord {
            last_name,
            first_name,
            team_name: row[team].trim().to_string(),
            grade: cell(row, grade),
            number: cell(row, number),
            file_number: sequence,
            batch: batch_value,
            photo: photo_value,
            spa: spa_value,
            extra: table.columns(row),
        });
    }
    Ok(records)
}

/// Resolve the camera reference with the person hint, then the SPA name.
fn locate_record(resolver: &Resolver, record: &OutputRecord) -> Option<PathBuf> {
    let hint = record.person_hint();
    let found = resolver
        .resolve(&record.photo, hint.as_ref())
        .or_else(|| {
            (record.spa != record.photo)
                .then(|| resolver.resolve(&record.spa, hint.as_ref()))
                .flatten()
        })?;
    if found.is_ambiguous() {
        tracing::debug!(
            "{}: {} candidates, using {}",
            record.spa,
            found.paths.len(),
            found.first().display()
        );
    }
    Some(found.first().to_path_buf())
}

/// Team name as a single path component; `None` when nothing usable is left.
fn team_folder(team: &str) -> Option<String> {
    let folder = team.trim().replace(['/', '\\'], "-");
    match folder.as_str() {
        "" | "." | ".." => None,
        _ => Some(folder),
    }
}

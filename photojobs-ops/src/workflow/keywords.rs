//! Tag every resolved photo with the person's name and mirror it into
//! `<root>_keywords`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::Utc;

use photojobs_core::{split_photo_refs, PersonHint, Table};
use photojobs_resolver::Resolver;

use crate::apply::{copy_verified, sibling_dir};
use crate::error::{io_err, OpsError};
use crate::summary::{write_failures_log, ItemOutcome, RunSummary};
use crate::tagger::{keyword_list, MetadataTagger};

use super::{require_dir, require_file};

pub const OUTPUT_SUFFIX: &str = "_keywords";
pub const FAILURES_LOG: &str = "_keyword_failures.txt";

#[derive(Debug, Clone)]
pub struct KeywordOptions {
    pub csv: PathBuf,
    pub root: PathBuf,
    /// Extra keyword written after the name.
    pub manual: Option<String>,
    /// Defaults to `<root>_keywords`.
    pub out_dir: Option<PathBuf>,
    /// Scratch space for tagging; defaults to the system temp dir.
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct KeywordReport {
    pub out_dir: PathBuf,
    pub rows: usize,
    pub rows_with_success: usize,
    /// Distinct output files written.
    pub files_updated: usize,
    pub failures_log: PathBuf,
    pub items: Vec<ItemOutcome>,
    pub summary: RunSummary,
}

/// Normalized-header lookups for one keyword table.
struct Columns {
    spa: Option<usize>,
    photos: Option<usize>,
    first: Option<usize>,
    last: Option<usize>,
    name: Option<usize>,
}

impl Columns {
    fn detect(table: &Table) -> Self {
        Self {
            spa: table.column_normalized("spa"),
            photos: table.column_normalized("photofilenames"),
            first: table
                .column_normalized("firstname")
                .or_else(|| table.column_normalized("firstnmae")),
            last: table.column_normalized("lastname"),
            name: table.column_normalized("name"),
        }
    }
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.map(|i| row[i].trim()).unwrap_or_default()
}

pub fn run(opts: &KeywordOptions, tagger: &dyn MetadataTagger) -> Result<KeywordReport, OpsError> {
    require_file(&opts.csv)?;
    require_dir(&opts.root)?;

    let table = Table::read(&opts.csv)?;
    let cols = Columns::detect(&table);
    if cols.spa.is_none() && cols.photos.is_none() {
        return Err(table.missing_columns(&["SPA or Photo Filenames"]).into());
    }

    let resolver = Resolver::new(&opts.root)?;
    let out_dir = opts
        .out_dir
        .clone()
        .unwrap_or_else(|| sibling_dir(&opts.root, OUTPUT_SUFFIX));
    let temp_dir = opts
        .temp_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("photojobs-keywords"));
    for dir in [&out_dir, &temp_dir] {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    let manual: Vec<String> = opts.manual.iter().cloned().collect();

    let mut items = Vec::new();
    let mut rows_with_success = 0;
    let mut updated: BTreeSet<PathBuf> = BTreeSet::new();

    for (i, row) in table.rows.iter().enumerate() {
        // Spreadsheet line: the header is line 1.
        let row_no = i + 2;
        let subject = format!("row {row_no}");

        let refs = match (cell(row, cols.photos), cell(row, cols.spa)) {
            ("", "") => {
                items.push(ItemOutcome::failed(subject, "no SPA or Photo Filenames value"));
                continue;
            }
            ("", spa) => vec![spa.to_string()],
            (raw, _) => match split_photo_refs(raw) {
                refs if !refs.is_empty() => refs,
                _ => {
                    tracing::warn!("{subject}: Photo Filenames '{raw}' holds no file names");
                    items.push(ItemOutcome::failed(
                        subject,
                        "Photo Filenames present but empty after parsing",
                    ));
                    continue;
                }
            },
        };

        let (first, last) = (cell(row, cols.first), cell(row, cols.last));
        let name = match format!("{first} {last}").trim() {
            "" => cell(row, cols.name).to_string(),
            full => full.to_string(),
        };
        if name.is_empty() {
            items.push(ItemOutcome::failed(subject, "no name for row"));
            continue;
        }
        let keywords = keyword_list(&name, &manual);
        let hint = PersonHint::new(first, last);

        let mut row_ok = false;
        for (ref_no, reference) in refs.iter().enumerate() {
            let matches = resolver.locate(reference, hint.as_ref());
            if matches.is_empty() {
                items.push(ItemOutcome::missing(reference, subject.clone()));
                continue;
            }
            for (match_no, original) in matches.iter().enumerate() {
                let scratch = scratch_path(&temp_dir, original, row_no, ref_no + 1, match_no + 1);
                let target = mirrored_path(&opts.root, &out_dir, original);
                let outcome = match tag_one(tagger, original, &scratch, &target, &keywords) {
                    Ok(()) => {
                        row_ok = true;
                        updated.insert(target.clone());
                        ItemOutcome::Written {
                            source: original.clone(),
                            destination: target,
                        }
                    }
                    Err(err) => ItemOutcome::failed(original.display().to_string(), err),
                };
                let _ = std::fs::remove_file(&scratch);
                items.push(outcome);
            }
        }
        if row_ok {
            rows_with_success += 1;
        }
    }

    let summary = RunSummary::from_outcomes(&items);
    let failures_log = out_dir.join(FAILURES_LOG);
    write_failures_log(
        &failures_log,
        "Keyword run summary",
        &summary,
        &[
            ("CSV".to_string(), opts.csv.display().to_string()),
            ("Root".to_string(), opts.root.display().to_string()),
            ("Rows".to_string(), table.rows.len().to_string()),
            ("Rows with success".to_string(), rows_with_success.to_string()),
            ("Files updated".to_string(), updated.len().to_string()),
        ],
        Utc::now(),
    )?;

    Ok(KeywordReport {
        out_dir,
        rows: table.rows.len(),
        rows_with_success,
        files_updated: updated.len(),
        failures_log,
        items,
        summary,
    })
}

/// Copy to scratch, tag, confirm the primary keyword stuck, then copy out.
fn tag_one(
    tagger: &dyn MetadataTagger,
    original: &Path,
    scratch: &Path,
    target: &Path,
    keywords: &[String],
) -> Result<(), OpsError> {
    std::fs::copy(original, scratch).map_err(|e| io_err(scratch, e))?;
    tagger.apply_keywords(scratch, keywords)?;

    let primary = &keywords[0];
    let present = tagger.read_keywords(scratch)?;
    if !present.iter().any(|k| k.eq_ignore_ascii_case(primary)) {
        return Err(OpsError::Tagger {
            path: original.to_path_buf(),
            message: format!("'{primary}' not present after write"),
        });
    }
    copy_verified(scratch, target)
}

/// Unique per (row, reference, match) so repeated stems never collide.
fn scratch_path(temp_dir: &Path, original: &Path, row: usize, reference: usize, hit: usize) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = original
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    temp_dir.join(format!("{stem}__r{row}_f{reference}_m{hit}{ext}"))
}

/// `original`'s place under `out_dir`, keeping its path relative to `root`.
pub fn mirrored_path(root: &Path, out_dir: &Path, original: &Path) -> PathBuf {
    match original.strip_prefix(root) {
        Ok(rel) => out_dir.join(rel),
        Err(_) => out_dir.join(original.file_name().unwrap_or(original.as_os_str())),
    }
}

//! Roster to derived tables and rename plan.

use std::path::{Path, PathBuf};

use photojobs_core::{BatchSuffixes, Field, HeaderAliases, OutputRecord, Roster, Variant};

use crate::error::OpsError;
use crate::expand::expand_all;
use crate::summary::{ItemOutcome, RunSummary};
use crate::tables::{write_derived_table, write_rename_plan, DerivedLayout};

use super::require_file;

#[derive(Debug, Clone)]
pub struct CsvgenOptions {
    pub csv: PathBuf,
    pub job_name: String,
    /// Roster header holding the team name.
    pub team_field: String,
    /// Defaults to the roster's directory.
    pub out_dir: Option<PathBuf>,
    pub batch_suffixes: BatchSuffixes,
}

#[derive(Debug)]
pub struct CsvgenReport {
    pub out_dir: PathBuf,
    /// Roster rows read.
    pub rows: usize,
    /// Output records produced (two per reference).
    pub records: usize,
    pub items: Vec<ItemOutcome>,
    pub summary: RunSummary,
}

/// File names written for `job`, in write order: JPG, PNG, ALL, RENAME.
pub fn output_names(job: &str) -> [String; 4] {
    [
        format!("{job} DATA-JPG.csv"),
        format!("{job} DATA-PNG.csv"),
        format!("{job} DATA-ALL.csv"),
        format!("{job} DATA-RENAME.txt"),
    ]
}

pub fn run(opts: &CsvgenOptions) -> Result<CsvgenReport, OpsError> {
    require_file(&opts.csv)?;
    let out_dir = match &opts.out_dir {
        Some(dir) => dir.clone(),
        None => opts
            .csv
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let aliases = HeaderAliases::new(&opts.team_field);
    let roster = Roster::read(
        &opts.csv,
        &aliases,
        &[Field::LastName, Field::FirstName, Field::Photos],
    )?;
    tracing::debug!(
        "read {} roster rows from {}",
        roster.records.len(),
        roster.path.display()
    );

    let expansion = expand_all(&roster.records, &opts.batch_suffixes);
    let layout = DerivedLayout::from_headers(&roster.headers, &aliases);

    let of_variant = |variant: Variant| -> Vec<&OutputRecord> {
        expansion
            .records
            .iter()
            .filter(|r| r.spa.ends_with(variant.extension()))
            .collect()
    };
    let jpg = of_variant(Variant::Jpg);
    let png = of_variant(Variant::Png);
    let all: Vec<&OutputRecord> = jpg.iter().chain(png.iter()).copied().collect();

    let [jpg_name, png_name, all_name, plan_name] = output_names(&opts.job_name);
    let mut items = expansion.skipped.clone();
    for (name, rows) in [(jpg_name, &jpg), (png_name, &png), (all_name, &all)] {
        let path = out_dir.join(name);
        write_derived_table(&path, &layout, rows)?;
        items.push(ItemOutcome::Written {
            source: opts.csv.clone(),
            destination: path,
        });
    }
    let plan = out_dir.join(plan_name);
    write_rename_plan(&plan, &jpg)?;
    items.push(ItemOutcome::Written {
        source: opts.csv.clone(),
        destination: plan,
    });

    Ok(CsvgenReport {
        out_dir,
        rows: roster.records.len(),
        records: expansion.records.len(),
        summary: RunSummary::from_outcomes(&items),
        items,
    })
}

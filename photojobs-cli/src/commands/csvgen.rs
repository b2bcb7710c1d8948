//! `photojobs csvgen` — roster to derived tables and rename plan.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use photojobs_core::config::parse_batch_suffixes;
use photojobs_ops::workflow::csvgen::{self, CsvgenOptions};

use super::{print_items, print_json, print_summary, resolve_path, RunContext, RunJson};

/// Arguments for `photojobs csvgen`.
#[derive(Args, Debug)]
pub struct CsvgenArgs {
    /// Roster CSV (needs Last Name, First Name, Photo Filenames).
    #[arg(long)]
    pub csv: PathBuf,

    /// Job name used as the output file prefix.
    #[arg(long = "jobname")]
    pub job_name: String,

    /// Roster header holding the team name [default: Team].
    #[arg(long)]
    pub team_field: Option<String>,

    /// Output directory (default: the roster's directory).
    #[arg(long = "outdir")]
    pub out_dir: Option<PathBuf>,

    /// Per-batch filename suffixes, e.g. `JS10:_a,JS20:_b`.
    #[arg(long)]
    pub batch_suffixes: Option<String>,
}

#[derive(Serialize)]
struct Details {
    rows: usize,
    records: usize,
}

impl CsvgenArgs {
    pub fn run(self, ctx: &RunContext) -> Result<()> {
        let mut batch_suffixes = ctx.job.batch_suffixes.clone();
        if let Some(raw) = &self.batch_suffixes {
            batch_suffixes.extend(parse_batch_suffixes(raw).context("bad --batch-suffixes")?);
        }

        let opts = CsvgenOptions {
            csv: resolve_path(&self.csv)?,
            job_name: self.job_name,
            team_field: self
                .team_field
                .or_else(|| ctx.job.team_field.clone())
                .unwrap_or_else(|| "Team".to_string()),
            out_dir: self.out_dir.as_deref().map(resolve_path).transpose()?,
            batch_suffixes,
        };
        let report = csvgen::run(&opts)
            .with_context(|| format!("csvgen failed for {}", opts.csv.display()))?;

        if ctx.json {
            return print_json(&RunJson {
                command: "csvgen",
                output: &report.out_dir,
                summary: &report.summary,
                details: Details {
                    rows: report.rows,
                    records: report.records,
                },
                items: &report.items,
            });
        }

        print_items(&report.items);
        print_summary(
            "csvgen",
            &report.out_dir,
            &report.summary,
            &[
                ("roster rows", report.rows.to_string()),
                ("output records", report.records.to_string()),
            ],
        );
        Ok(())
    }
}

//! `photojobs keywords` — tag each person's photos with their name.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use photojobs_ops::workflow::keywords::{self, KeywordOptions};
use photojobs_ops::ExifTool;

use super::{print_items, print_json, print_summary, resolve_path, RunContext, RunJson};

/// Arguments for `photojobs keywords`.
#[derive(Args, Debug)]
pub struct KeywordsArgs {
    /// Roster or derived table with first and last names and photo references.
    #[arg(long)]
    pub csv: PathBuf,

    /// Folder holding the photos (searched recursively).
    #[arg(long)]
    pub root: PathBuf,

    /// Extra keyword added to every tagged file.
    #[arg(long)]
    pub manual: Option<String>,
}

#[derive(Serialize)]
struct Details<'a> {
    rows: usize,
    rows_with_success: usize,
    files_updated: usize,
    failures_log: &'a Path,
}

impl KeywordsArgs {
    pub fn run(self, ctx: &RunContext) -> Result<()> {
        let tagger = ExifTool::locate(ctx.job.exiftool.as_deref());
        let opts = KeywordOptions {
            csv: resolve_path(&self.csv)?,
            root: resolve_path(&self.root)?,
            manual: self.manual.filter(|m| !m.trim().is_empty()),
            out_dir: None,
            temp_dir: ctx.job.temp_dir.clone(),
        };
        let report = keywords::run(&opts, &tagger)
            .with_context(|| format!("keywords failed for {}", opts.csv.display()))?;

        if ctx.json {
            return print_json(&RunJson {
                command: "keywords",
                output: &report.out_dir,
                summary: &report.summary,
                details: Details {
                    rows: report.rows,
                    rows_with_success: report.rows_with_success,
                    files_updated: report.files_updated,
                    failures_log: &report.failures_log,
                },
                items: &report.items,
            });
        }

        print_items(&report.items);
        print_summary(
            "keywords",
            &report.out_dir,
            &report.summary,
            &[
                ("rows", report.rows.to_string()),
                ("rows with a tagged file", report.rows_with_success.to_string()),
                ("files updated", report.files_updated.to_string()),
            ],
        );
        println!("Failures log: {}", report.failures_log.display());
        Ok(())
    }
}

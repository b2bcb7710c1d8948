//! `photojobs rename` — apply a rename plan.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use photojobs_ops::workflow::rename::{self, RenameOptions, TransferMode};

use super::{print_items, print_json, print_summary, resolve_path, RunContext, RunJson};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ModeArg {
    #[default]
    Copy,
    Move,
}

impl From<ModeArg> for TransferMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Copy => TransferMode::Copy,
            ModeArg::Move => TransferMode::Move,
        }
    }
}

/// Arguments for `photojobs rename`.
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Folder holding the source photos (searched recursively).
    #[arg(long)]
    pub root: PathBuf,

    /// Rename plan: tab-separated `.txt`/`.tsv`, or CSV with PHOTO and NEWFILENAME.
    #[arg(long)]
    pub plan: PathBuf,

    /// Copy every destination, or move the source to its last destination.
    #[arg(long, value_enum, default_value_t = ModeArg::Copy)]
    pub mode: ModeArg,
}

#[derive(Serialize)]
struct Details {
    mode: TransferMode,
    sources: usize,
    destinations: usize,
    ambiguous: usize,
}

impl RenameArgs {
    pub fn run(self, ctx: &RunContext) -> Result<()> {
        let opts = RenameOptions {
            root: resolve_path(&self.root)?,
            plan: resolve_path(&self.plan)?,
            mode: self.mode.into(),
            out_dir: None,
        };
        let report = rename::run(&opts)
            .with_context(|| format!("rename failed for {}", opts.plan.display()))?;

        if ctx.json {
            return print_json(&RunJson {
                command: "rename",
                output: &report.out_dir,
                summary: &report.summary,
                details: Details {
                    mode: opts.mode,
                    sources: report.sources,
                    destinations: report.destinations,
                    ambiguous: report.ambiguous,
                },
                items: &report.items,
            });
        }

        print_items(&report.items);
        print_summary(
            &format!("rename ({})", opts.mode),
            &report.out_dir,
            &report.summary,
            &[
                ("source files", report.sources.to_string()),
                ("destination files", report.destinations.to_string()),
                ("ambiguous sources", report.ambiguous.to_string()),
            ],
        );
        Ok(())
    }
}

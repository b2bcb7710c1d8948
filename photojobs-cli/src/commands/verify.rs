use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use photojobs_ops::workflow::verify::{self, VerifyOptions};
use photojobs_ops::ExifTool;

use super::{print_items, print_json, print_summary, resolve_path, RunContext, RunJson};

/// Arguments for `photojobs verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Folder holding the original photos.
    #[arg(long)]
    pub root: PathBuf,

    /// Keyword output to check (default: `<root>_keywords`).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Serialize)]
struct Details {
    checked: usize,
}

impl VerifyArgs {
    pub fn run(self, ctx: &RunContext) -> Result<()> {
        let tagger = ExifTool::locate(ctx.job.exiftool.as_deref());
        let opts = VerifyOptions {
            root: resolve_path(&self.root)?,
            out_dir: self.out.as_deref().map(resolve_path).transpose()?,
        };
        let report = verify::run(&opts, &tagger)
            .with_context(|| format!("verify failed for {}", opts.root.display()))?;

        if ctx.json {
            return print_json(&RunJson {
                command: "verify",
                output: &report.out_dir,
                summary: &report.summary,
                details: Details {
                    checked: report.checked,
                },
                items: &report.items,
            });
        }

        print_items(&report.items);
        print_summary(
            "verify",
            &report.out_dir,
            &report.summary,
            &[("files checked", report.checked.to_string())],
        );
        Ok(())
    }
}

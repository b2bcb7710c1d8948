//! `photojobs scale` — resize a folder of images to a target long side.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use photojobs_ops::workflow::scale::{self, ScaleOptions};
use photojobs_ops::ImageResampler;

use super::{print_items, print_json, print_summary, resolve_path, RunContext, RunJson};

/// Arguments for `photojobs scale`.
#[derive(Args, Debug)]
pub struct ScaleArgs {
    /// Folder of images (top level only).
    #[arg(long)]
    pub root: PathBuf,

    /// Target size in pixels for the longer side.
    #[arg(long)]
    pub size: u32,
}

#[derive(Serialize)]
struct Details {
    size: u32,
    images: usize,
    scaled: usize,
}

impl ScaleArgs {
    pub fn run(self, ctx: &RunContext) -> Result<()> {
        let opts = ScaleOptions {
            root: resolve_path(&self.root)?,
            size: self.size,
            out_dir: None,
        };
        let report = scale::run(&opts, &ImageResampler)
            .with_context(|| format!("scale failed for {}", opts.root.display()))?;

        if ctx.json {
            return print_json(&RunJson {
                command: "scale",
                output: &report.out_dir,
                summary: &report.summary,
                details: Details {
                    size: opts.size,
                    images: report.images,
                    scaled: report.scaled.len(),
                },
                items: &report.items,
            });
        }

        print_items(&report.items);
        print_summary(
            &format!("scale to {}px", opts.size),
            &report.out_dir,
            &report.summary,
            &[
                ("images found", report.images.to_string()),
                ("scaled", report.scaled.len().to_string()),
            ],
        );
        Ok(())
    }
}

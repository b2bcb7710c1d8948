//! Apply a rename plan: copy (or move) each source to every destination.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use photojobs_resolver::Resolver;

use crate::apply::{copy_verified, destination_path, move_file, sibling_dir};
use crate::error::{io_err, OpsError};
use crate::summary::{ItemOutcome, RunSummary};
use crate::tables::read_rename_plan;

use super::{require_dir, require_file};

pub const OUTPUT_SUFFIX: &str = "_renamed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    #[default]
    Copy,
    /// Copy to every destination but the last, which receives the original.
    Move,
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Copy => write!(f, "copy"),
            TransferMode::Move => write!(f, "move"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub root: PathBuf,
    pub plan: PathBuf,
    pub mode: TransferMode,
    /// Defaults to `<root>_renamed`.
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RenameReport {
    pub out_dir: PathBuf,
    pub sources: usize,
    pub destinations: usize,
    /// Sources that matched more than one file.
    pub ambiguous: usize,
    pub items: Vec<ItemOutcome>,
    pub summary: RunSummary,
}

pub fn run(opts: &RenameOptions) -> Result<RenameReport, OpsError> {
    require_dir(&opts.root)?;
    require_file(&opts.plan)?;

    let mapping = read_rename_plan(&opts.plan)?;
    let resolver = Resolver::new(&opts.root)?;
    let out_dir = opts
        .out_dir
        .clone()
        .unwrap_or_else(|| sibling_dir(&opts.root, OUTPUT_SUFFIX));
    std::fs::create_dir_all(&out_dir).map_err(|e| io_err(&out_dir, e))?;
    tracing::info!(
        "{} source(s), {} destination(s) -> {}",
        mapping.len(),
        mapping.destination_count(),
        out_dir.display()
    );

    let mut items = Vec::with_capacity(mapping.destination_count());
    let mut ambiguous = 0;
    for (source, destinations) in mapping.iter() {
        let Some(found) = resolver.resolve(source, None) else {
            tracing::warn!("source not found: {source}");
            for destination in destinations {
                items.push(ItemOutcome::missing(source, format!("for {destination}")));
            }
            continue;
        };
        if found.is_ambiguous() {
            ambiguous += 1;
            tracing::warn!(
                "{source}: {} candidates, using {}",
                found.paths.len(),
                found.first().display()
            );
        }

        let resolved = found.first();
        let last = destinations.len() - 1;
        for (i, destination) in destinations.iter().enumerate() {
            let target = destination_path(&out_dir, destination, resolved);
            let result = if opts.mode == TransferMode::Move && i == last {
                move_file(resolved, &target)
            } else {
                copy_verified(resolved, &target)
            };
            items.push(match result {
                Ok(()) => ItemOutcome::Written {
                    source: resolved.to_path_buf(),
                    destination: target,
                },
                Err(err) => ItemOutcome::failed(format!("{source} -> {destination}"), err),
            });
        }
    }

    Ok(RenameReport {
        out_dir,
        sources: mapping.len(),
        destinations: mapping.destination_count(),
        ambiguous,
        summary: RunSummary::from_outcomes(&items),
        items,
    })
}

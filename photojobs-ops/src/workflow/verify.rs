//! Check that every source photo has a tagged mirror in the keyword output.

use std::path::PathBuf;

use photojobs_resolver::FileIndex;

use crate::apply::sibling_dir;
use crate::error::OpsError;
use crate::summary::{ItemOutcome, RunSummary};
use crate::tagger::MetadataTagger;

use super::keywords::{mirrored_path, OUTPUT_SUFFIX};
use super::require_dir;

#[derive(Debug, Clone)]
pub struct VerifyOptions {
    pub root: PathBuf,
    /// Defaults to `<root>_keywords`.
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct VerifyReport {
    pub out_dir: PathBuf,
    pub checked: usize,
    pub items: Vec<ItemOutcome>,
    pub summary: RunSummary,
}

pub fn run(opts: &VerifyOptions, tagger: &dyn MetadataTagger) -> Result<VerifyReport, OpsError> {
    require_dir(&opts.root)?;
    let out_dir = opts
        .out_dir
        .clone()
        .unwrap_or_else(|| sibling_dir(&opts.root, OUTPUT_SUFFIX));
    require_dir(&out_dir)?;

    let index = FileIndex::scan(&opts.root)?;
    let mut items = Vec::new();
    for source in index.files() {
        let hidden = source
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        if hidden {
            continue;
        }
        let rel = source
            .strip_prefix(&opts.root)
            .unwrap_or(source.as_path())
            .display()
            .to_string();
        let mirror = mirrored_path(&opts.root, &out_dir, source);
        if !mirror.is_file() {
            items.push(ItemOutcome::missing(rel, "not in output"));
            continue;
        }
        items.push(match tagger.read_keywords(&mirror) {
            Ok(keywords) if keywords.is_empty() => ItemOutcome::failed(rel, "no keywords"),
            Ok(_) => ItemOutcome::Verified { path: mirror },
            Err(err) => ItemOutcome::failed(rel, err),
        });
    }

    Ok(VerifyReport {
        out_dir,
        checked: items.len(),
        summary: RunSummary::from_outcomes(&items),
        items,
    })
}

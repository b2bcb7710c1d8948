//! Resize every image directly in a folder into `<root>_<size>`.

use std::path::{Path, PathBuf};

use photojobs_resolver::list_dir;

use crate::apply::sibling_dir;
use crate::error::{io_err, OpsError};
use crate::resample::Resampler;
use crate::summary::{ItemOutcome, RunSummary};

use super::require_dir;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone)]
pub struct ScaleOptions {
    pub root: PathBuf,
    /// Target long side in pixels.
    pub size: u32,
    /// Defaults to `<root>_<size>`.
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ScaleReport {
    pub out_dir: PathBuf,
    pub images: usize,
    /// Output path and written dimensions per scaled image.
    pub scaled: Vec<(PathBuf, u32, u32)>,
    pub items: Vec<ItemOutcome>,
    pub summary: RunSummary,
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

pub fn run(opts: &ScaleOptions, resampler: &dyn Resampler) -> Result<ScaleReport, OpsError> {
    require_dir(&opts.root)?;
    if opts.size == 0 {
        return Err(OpsError::InvalidArgument(
            "size must be a positive number of pixels".to_string(),
        ));
    }
    let out_dir = opts
        .out_dir
        .clone()
        .unwrap_or_else(|| sibling_dir(&opts.root, &format!("_{}", opts.size)));
    std::fs::create_dir_all(&out_dir).map_err(|e| io_err(&out_dir, e))?;

    let images: Vec<PathBuf> = list_dir(&opts.root)?
        .into_iter()
        .filter(|p| is_image(p))
        .collect();
    if images.is_empty() {
        tracing::warn!("no .jpg/.jpeg/.png files in {}", opts.root.display());
    }

    let mut items = Vec::with_capacity(images.len());
    let mut scaled = Vec::new();
    for source in &images {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = out_dir.join(name);
        if target.exists() {
            items.push(ItemOutcome::Skipped {
                path: target,
                reason: "output already exists".to_string(),
            });
            continue;
        }
        match resampler.resize(source, &target, opts.size) {
            Ok((width, height)) => {
                tracing::info!("scaled {} to {width}x{height}", source.display());
                scaled.push((target.clone(), width, height));
                items.push(ItemOutcome::Written {
                    source: source.clone(),
                    destination: target,
                });
            }
            Err(err) => items.push(ItemOutcome::failed(source.display().to_string(), err)),
        }
    }

    Ok(ScaleReport {
        out_dir,
        images: images.len(),
        scaled,
        summary: RunSummary::from_outcomes(&items),
        items,
    })
}

//! Putting files in place: output directories, copy-and-verify, move.

use std::fs::File;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, OpsError};

/// `<parent>/<name><suffix>` beside `root`, e.g. `shoot` → `shoot_renamed`.
pub fn sibling_dir(root: &Path, suffix: &str) -> PathBuf {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = root.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!("{name}{suffix}"))
}

/// Destination for `destination_name` inside `out_dir`.
///
/// The extension always comes from `resolved_source`; whatever extension the
/// name carries is discarded.
pub fn destination_path(out_dir: &Path, destination_name: &str, resolved_source: &Path) -> PathBuf {
    let stem = Path::new(destination_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| destination_name.to_string());
    let file_name = match resolved_source.extension() {
        Some(ext) => format!("{stem}.{}", ext.to_string_lossy()),
        None => stem,
    };
    out_dir.join(file_name)
}

/// SHA-256 of a file's contents, lowercase hex.
pub fn file_digest(path: &Path) -> Result<String, OpsError> {
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| io_err(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Copy `source` to `destination`, creating parents, then compare digests.
pub fn copy_verified(source: &Path, destination: &Path) -> Result<(), OpsError> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::copy(source, destination).map_err(|e| io_err(destination, e))?;

    if file_digest(source)? != file_digest(destination)? {
        return Err(OpsError::Verify {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    tracing::info!("copied: {} -> {}", source.display(), destination.display());
    Ok(())
}

/// Move `source` to `destination`; falls back to copy-and-delete across
/// filesystems.
pub fn move_file(source: &Path, destination: &Path) -> Result<(), OpsError> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if std::fs::rename(source, destination).is_err() {
        copy_verified(source, destination)?;
        std::fs::remove_file(source).map_err(|e| io_err(source, e))?;
    }
    tracing::info!("moved: {} -> {}", source.display(), destination.display());
    Ok(())
}

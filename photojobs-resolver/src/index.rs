//! Filesystem listings the rules run against.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ResolveError;

/// Every regular file under a root, recursively, in lexical path order.
///
/// Built once per resolver; the scan is name-only and never opens files.
#[derive(Debug, Clone)]
pub struct FileIndex {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl FileIndex {
    pub fn scan(root: &Path) -> Result<Self, ResolveError> {
        if !root.is_dir() {
            return Err(ResolveError::RootNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping unreadable entry under {}: {err}", root.display());
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();

        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Regular files directly inside `dir` (non-recursive), lexical order.
pub fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let io = |source| ResolveError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

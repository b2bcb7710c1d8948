//! The six end-to-end workflows. Each one checks its inputs, does its work
//! item by item, and returns a report carrying a [`RunSummary`].
//!
//! [`RunSummary`]: crate::summary::RunSummary

pub mod csvgen;
pub mod keywords;
pub mod rename;
pub mod scale;
pub mod teams;
pub mod verify;

use std::path::Path;

use photojobs_core::CoreError;

use crate::error::OpsError;

fn require_file(path: &Path) -> Result<(), OpsError> {
    if path.is_file() {
        return Ok(());
    }
    Err(CoreError::NotFound {
        path: path.to_path_buf(),
    }
    .into())
}

fn require_dir(path: &Path) -> Result<(), OpsError> {
    if path.is_dir() {
        return Ok(());
    }
    Err(CoreError::NotFound {
        path: path.to_path_buf(),
    }
    .into())
}

//! Error types for photojobs-core.

use std::path::PathBuf;

use thiserror::Error;

/// Structural errors raised while reading tables and configuration.
///
/// Every variant here aborts a run; per-row problems are reported through
/// the run summary instead.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content (bad quoting, invalid UTF-8, ...).
    #[error("failed to read table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The input table or root directory does not exist.
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// The table lacks one or more columns the operation requires.
    #[error("{path} is missing required column(s): {missing}; found: {found}")]
    MissingColumns {
        path: PathBuf,
        missing: String,
        found: String,
    },

    /// A `BATCH:_suffix` list entry could not be parsed.
    #[error("invalid batch suffix entry '{entry}'; expected BATCH:_suffix")]
    BatchSuffix { entry: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}

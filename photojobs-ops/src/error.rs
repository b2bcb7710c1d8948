//! Error types for photojobs-ops.
//!
//! Only structural failures travel as [`OpsError`]; per-item failures are
//! recorded in a [`RunSummary`](crate::summary::RunSummary) and the run
//! continues.

use std::path::PathBuf;

use thiserror::Error;

use photojobs_core::CoreError;
use photojobs_resolver::ResolveError;

/// All errors that can arise from workflow operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Reading the roster, a derived table, or the config failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The search root could not be indexed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a CSV/TSV output failed.
    #[error("failed to write table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON decoding of tagger output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decode/encode failure in the resampler.
    #[error("image error at {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A copied file's digest differs from its source.
    #[error("copy verification failed: {destination} does not match {source_path}")]
    Verify {
        source_path: PathBuf,
        destination: PathBuf,
    },

    /// The metadata tagger reported a failure.
    #[error("tagger failed on {path}: {message}")]
    Tagger { path: PathBuf, message: String },

    /// A run needed an answer (default team, batch selection) and none was
    /// configured while prompting is disabled.
    #[error("no answer configured for: {question}")]
    Unanswered { question: String },

    /// The input parsed but contained nothing to act on.
    #[error("no usable {what} found in {path}")]
    Empty { path: PathBuf, what: &'static str },

    /// A workflow argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience constructor for [`OpsError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> OpsError {
    OpsError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn csv_err(path: impl Into<PathBuf>, source: csv::Error) -> OpsError {
    OpsError::Csv {
        path: path.into(),
        source,
    }
}

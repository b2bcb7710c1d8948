//! Per-item outcomes and the run summary every workflow ends with.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{io_err, OpsError};

// ---------------------------------------------------------------------------
// Item outcomes
// ---------------------------------------------------------------------------

/// What happened to one unit of work (one file, one destination, one row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// A file was produced at `destination`.
    Written { source: PathBuf, destination: PathBuf },
    /// An existing output was checked and is in order.
    Verified { path: PathBuf },
    /// The output already existed and was left alone.
    Skipped { path: PathBuf, reason: String },
    /// A reference did not resolve to any file.
    Missing { reference: String, context: String },
    /// The item was attempted and failed.
    Failed { subject: String, reason: String },
}

impl ItemOutcome {
    pub fn failed(subject: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Failed {
            subject: subject.into(),
            reason: reason.to_string(),
        }
    }

    pub fn missing(reference: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Missing {
            reference: reference.into(),
            context: context.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Missing { .. } | Self::Failed { .. })
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written {
                source,
                destination,
            } => write!(f, "{} -> {}", source.display(), destination.display()),
            Self::Verified { path } => write!(f, "ok: {}", path.display()),
            Self::Skipped { path, reason } => write!(f, "skipped {}: {reason}", path.display()),
            Self::Missing { reference, context } if context.is_empty() => {
                write!(f, "missing: {reference}")
            }
            Self::Missing { reference, context } => write!(f, "missing: {reference} ({context})"),
            Self::Failed { subject, reason } => write!(f, "failed: {subject}: {reason}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Counters plus one human-readable line per failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub missing: usize,
    pub errored: usize,
    pub skipped: usize,
    pub failures: Vec<String>,
}

impl RunSummary {
    /// Count `outcome` and keep its line if it is a failure.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Written { .. } | ItemOutcome::Verified { .. } => {
                self.attempted += 1;
                self.succeeded += 1;
            }
            ItemOutcome::Skipped { .. } => self.skipped += 1,
            ItemOutcome::Missing { .. } => {
                self.attempted += 1;
                self.missing += 1;
                self.failures.push(outcome.to_string());
            }
            ItemOutcome::Failed { .. } => {
                self.attempted += 1;
                self.errored += 1;
                self.failures.push(outcome.to_string());
            }
        }
    }

    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a ItemOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted {}, succeeded {}, missing {}, errored {}",
            self.attempted, self.succeeded, self.missing, self.errored
        )?;
        if self.skipped > 0 {
            write!(f, ", skipped {}", self.skipped)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Failures log
// ---------------------------------------------------------------------------

/// Write the summary and every failure line to `path`, replacing any
/// previous log.
pub fn write_failures_log(
    path: &Path,
    title: &str,
    summary: &RunSummary,
    extra: &[(String, String)],
    at: DateTime<Utc>,
) -> Result<(), OpsError> {
    let mut out = String::new();
    out.push_str(&format!("{title}\n"));
    out.push_str(&format!("Run at: {}\n\n", at.to_rfc3339()));
    for (label, value) in extra {
        out.push_str(&format!("{label}: {value}\n"));
    }
    out.push_str(&format!("Attempted: {}\n", summary.attempted));
    out.push_str(&format!("Succeeded: {}\n", summary.succeeded));
    out.push_str(&format!("Missing: {}\n", summary.missing));
    out.push_str(&format!("Errored: {}\n", summary.errored));
    out.push_str(&format!("\nFailures ({}):\n", summary.failures.len()));
    for line in &summary.failures {
        out.push_str(&format!("- {line}\n"));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(path, out).map_err(|e| io_err(path, e))?;
    tracing::info!("wrote failures log: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn counters_follow_outcomes() {
        let outcomes = vec![
            ItemOutcome::Written {
                source: "a.jpg".into(),
                destination: "out/a.jpg".into(),
            },
            ItemOutcome::missing("JS101234.jpg", "Allen Brielle"),
            ItemOutcome::failed("b.jpg", "permission denied"),
            ItemOutcome::Skipped {
                path: "c.jpg".into(),
                reason: "exists".into(),
            },
        ];
        let summary = RunSummary::from_outcomes(&outcomes);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            summary.failures,
            vec![
                "missing: JS101234.jpg (Allen Brielle)".to_string(),
                "failed: b.jpg: permission denied".to_string()
            ]
        );
        assert!(!summary.is_clean());
    }

    #[test]
    fn failures_log_lists_every_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("_keyword_failures.txt");
        let mut summary = RunSummary::default();
        summary.record(&ItemOutcome::missing("x.jpg", ""));

        write_failures_log(&path, "Keyword run", &summary, &[], Utc::now()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Keyword run\n"));
        assert!(text.contains("Missing: 1"));
        assert!(text.contains("- missing: x.jpg"));
    }
}

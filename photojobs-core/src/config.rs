//! Job configuration.
//!
//! # Lookup
//!
//! ```text
//! --config <path>                          explicit, must exist
//! <config_dir>/photojobs/config.yaml       optional, ignored when absent
//! ```
//!
//! Every function has two forms, mirroring the rest of the workspace:
//! - `fn_at(path, …)` — explicit location; used in tests with `TempDir`
//! - `fn(…)` — derives the location from `dirs::config_dir()`

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::types::BatchId;

/// Batch identifier -> filename suffix appended before the extension.
pub type BatchSuffixes = BTreeMap<BatchId, String>;

/// How the teams workflow groups records before picking a representative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupBy {
    /// One photo per (last, first).
    #[default]
    Person,
    /// One photo per (last, first, team); multi-team people get one per team.
    PersonTeam,
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupBy::Person => write!(f, "person"),
            GroupBy::PersonTeam => write!(f, "person-team"),
        }
    }
}

/// Values a run can take from a config file instead of flags or prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Roster header that holds the team name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_field: Option<String>,
    pub batch_suffixes: BatchSuffixes,
    /// Answer for the missing-team prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_team: Option<String>,
    /// Answer for the batch-selection prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batches: Option<Vec<BatchId>>,
    pub group_by: GroupBy,
    /// exiftool binary; probed in well-known locations when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exiftool: Option<PathBuf>,
    /// Scratch directory for keyword writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    /// Never prompt; unanswered questions become errors.
    pub non_interactive: bool,
}

/// `<config_dir>/photojobs/config.yaml` — pure, no I/O.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photojobs").join("config.yaml"))
}

/// Load `path`. Returns [`CoreError::NotFound`] if absent,
/// [`CoreError::Config`] (with path + line context) if malformed.
pub fn load_at(path: &Path) -> Result<JobConfig, CoreError> {
    if !path.exists() {
        return Err(CoreError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(JobConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| CoreError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the per-user config, falling back to defaults when there is none.
pub fn load() -> Result<JobConfig, CoreError> {
    match default_config_path() {
        Some(path) if path.exists() => load_at(&path),
        _ => Ok(JobConfig::default()),
    }
}

/// Parse `BATCH1:_suffix1,BATCH2:_suffix2`.
///
/// Whitespace around entries is ignored; an empty string yields an empty map.
pub fn parse_batch_suffixes(raw: &str) -> Result<BatchSuffixes, CoreError> {
    let mut map = BatchSuffixes::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((batch, suffix)) = entry.split_once(':') else {
            return Err(CoreError::BatchSuffix {
                entry: entry.to_string(),
            });
        };
        let batch = batch.trim();
        if batch.is_empty() {
            return Err(CoreError::BatchSuffix {
                entry: entry.to_string(),
            });
        }
        map.insert(BatchId::from(batch), suffix.trim().to_string());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_suffix_list() {
        let map = parse_batch_suffixes("JS10:_A, JS20:_B").unwrap();
        assert_eq!(map.get(&BatchId::from("JS10")).unwrap(), "_A");
        assert_eq!(map.get(&BatchId::from("JS20")).unwrap(), "_B");
        assert!(parse_batch_suffixes("").unwrap().is_empty());
    }

    #[test]
    fn rejects_entry_without_colon() {
        let err = parse_batch_suffixes("JS10_A").unwrap_err();
        assert!(err.to_string().contains("JS10_A"));
    }

    #[test]
    fn load_missing_config_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_at(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn yaml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut cfg = JobConfig {
            default_team: Some("Falcons".into()),
            group_by: GroupBy::PersonTeam,
            non_interactive: true,
            ..JobConfig::default()
        };
        cfg.batch_suffixes.insert(BatchId::from("JS10"), "_A".into());
        std::fs::write(&path, serde_yaml::to_string(&cfg).unwrap()).unwrap();
        assert_eq!(load_at(&path).unwrap(), cfg);
    }
}

//! Roster and derived-table reading.
//!
//! Tables are UTF-8 CSV with an optional byte-order mark. Headers are matched
//! case- and spacing-insensitively: `"Last Name"`, `"LASTNAME"` and
//! `"last name"` all normalize to `lastname`.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::types::{Columns, RosterRecord};

/// Columns the csvgen workflow consumes and never copies through.
pub const DROPPED_COLUMNS: [&str; 4] = [
    "Check-In Date",
    "Added With",
    "Photo Filenames",
    "Featured Photo",
];

/// Canonical field a roster header can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LastName,
    FirstName,
    TeamName,
    Grade,
    Number,
    Photos,
}

impl Field {
    /// Canonical output header.
    pub fn header(self) -> &'static str {
        match self {
            Field::LastName => "LASTNAME",
            Field::FirstName => "FIRSTNAME",
            Field::TeamName => "TEAMNAME",
            Field::Grade => "GRADE",
            Field::Number => "NUMBER",
            Field::Photos => "Photo Filenames",
        }
    }
}

/// Lowercase and drop all whitespace (and a stray BOM).
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Header alias table; only the team alias is configurable.
#[derive(Debug, Clone)]
pub struct HeaderAliases {
    team: String,
}

impl HeaderAliases {
    pub fn new(team_alias: &str) -> Self {
        Self {
            team: normalize_header(team_alias),
        }
    }

    pub fn field_for(&self, header: &str) -> Option<Field> {
        let norm = normalize_header(header);
        if norm == self.team {
            return Some(Field::TeamName);
        }
        match norm.as_str() {
            "lastname" => Some(Field::LastName),
            // "FIRSTNMAE" is a long-standing typo in some exports.
            "firstname" | "firstnmae" => Some(Field::FirstName),
            "teamname" => Some(Field::TeamName),
            "grade" => Some(Field::Grade),
            "number" => Some(Field::Number),
            "photofilenames" => Some(Field::Photos),
            _ => None,
        }
    }
}

impl Default for HeaderAliases {
    fn default() -> Self {
        Self::new("Team")
    }
}

// ---------------------------------------------------------------------------
// Raw tables
// ---------------------------------------------------------------------------

/// A whole CSV file held in memory, header order preserved.
#[derive(Debug, Clone)]
pub struct Table {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Read `path`. Short rows are padded with empty strings.
    pub fn read(path: &Path) -> Result<Self, CoreError> {
        if !path.is_file() {
            return Err(CoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let csv_err = |source| CoreError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(csv_err)?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    /// Index of the column whose header equals `header` exactly.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Index of the first column whose normalized header equals `normalized`.
    pub fn column_normalized(&self, normalized: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| normalize_header(h) == normalized)
    }

    /// Fail with [`CoreError::MissingColumns`] unless every header is present verbatim.
    pub fn require(&self, headers: &[&str]) -> Result<(), CoreError> {
        let missing: Vec<&str> = headers
            .iter()
            .copied()
            .filter(|h| self.column(h).is_none())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(self.missing_columns(&missing))
    }

    pub fn missing_columns(&self, missing: &[&str]) -> CoreError {
        CoreError::MissingColumns {
            path: self.path.clone(),
            missing: missing.join(", "),
            found: self.headers.join(", "),
        }
    }

    /// Row as `(header, value)` pairs.
    pub fn columns(&self, row: &[String]) -> Columns {
        self.headers
            .iter()
            .cloned()
            .zip(row.iter().cloned())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Rosters
// ---------------------------------------------------------------------------

/// A roster table with every row lifted into a [`RosterRecord`].
#[derive(Debug, Clone)]
pub struct Roster {
    pub path: PathBuf,
    /// Source headers in source order.
    pub headers: Vec<String>,
    pub records: Vec<RosterRecord>,
}

impl Roster {
    /// Read a roster, requiring the columns mapped to `required`.
    pub fn read(
        path: &Path,
        aliases: &HeaderAliases,
        required: &[Field],
    ) -> Result<Self, CoreError> {
        let table = Table::read(path)?;
        Self::from_table(table, aliases, required)
    }

    pub fn from_table(
        table: Table,
        aliases: &HeaderAliases,
        required: &[Field],
    ) -> Result<Self, CoreError> {
        let fields: Vec<Option<Field>> = table
            .headers
            .iter()
            .map(|h| aliases.field_for(h))
            .collect();

        let missing: Vec<&str> = required
            .iter()
            .filter(|f| !fields.contains(&Some(**f)))
            .map(|f| f.header())
            .collect();
        if !missing.is_empty() {
            return Err(table.missing_columns(&missing));
        }

        let records = table
            .rows
            .iter()
            .map(|row| {
                let mut record = RosterRecord::default();
                for ((header, value), field) in table.headers.iter().zip(row).zip(&fields) {
                    let slot = match field {
                        Some(Field::LastName) => &mut record.last_name,
                        Some(Field::FirstName) => &mut record.first_name,
                        Some(Field::TeamName) => &mut record.team_name,
                        Some(Field::Grade) => &mut record.grade,
                        Some(Field::Number) => &mut record.number,
                        Some(Field::Photos) => &mut record.photos,
                        None => {
                            record.extra.push((header.clone(), value.clone()));
                            continue;
                        }
                    };
                    // First non-empty value wins when two headers alias one field.
                    if slot.trim().is_empty() {
                        *slot = value.clone();
                    }
                }
                record
            })
            .collect();

        Ok(Self {
            path: table.path,
            headers: table.headers,
            records,
        })
    }
}

/// Look up a passthrough column by normalized header.
pub fn extra_value<'a>(record: &'a RosterRecord, normalized: &str) -> Option<&'a str> {
    record
        .extra
        .iter()
        .find(|(h, _)| normalize_header(h) == normalized)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

/// Split a photo reference cell.
///
/// Commas, semicolons, pipes, line breaks and any whitespace all separate
/// references; empty pieces are dropped.
pub fn split_photo_refs(raw: &str) -> Vec<String> {
    raw.split(|c: char| matches!(c, ',' | ';' | '|') || c.is_whitespace())
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn header_normalization() {
        assert_eq!(normalize_header("Last Name"), "lastname");
        assert_eq!(normalize_header("\u{feff}Photo  Filenames"), "photofilenames");
        assert_eq!(normalize_header("LASTNAME"), "lastname");
    }

    #[test]
    fn alias_table_resolves_configured_team_column() {
        let aliases = HeaderAliases::new("Squad");
        assert_eq!(aliases.field_for("squad"), Some(Field::TeamName));
        assert_eq!(aliases.field_for("TEAMNAME"), Some(Field::TeamName));
        assert_eq!(aliases.field_for("Team"), None);
        assert_eq!(aliases.field_for("FIRSTNMAE"), Some(Field::FirstName));
    }

    #[test]
    fn split_tolerates_every_separator() {
        let refs = split_photo_refs("A.jpg, B.jpg;C.jpg|D.jpg\r\nE.jpg F.jpg ,, ");
        assert_eq!(refs, vec!["A.jpg", "B.jpg", "C.jpg", "D.jpg", "E.jpg", "F.jpg"]);
        assert!(split_photo_refs(" ;|, \n").is_empty());
    }

    #[test]
    fn roster_read_maps_fields_and_keeps_extras_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roster.csv");
        fs::write(
            &path,
            "\u{feff}First Name,Last Name,Team,Jersey,Photo Filenames\n\
             Brielle,Allen,Falcons,42,\"JS106537.jpg, JS106538.jpg\"\n",
        )
        .unwrap();

        let roster = Roster::read(
            &path,
            &HeaderAliases::default(),
            &[Field::LastName, Field::FirstName, Field::Photos],
        )
        .unwrap();
        assert_eq!(roster.headers[0], "First Name");
        let rec = &roster.records[0];
        assert_eq!(rec.first_name, "Brielle");
        assert_eq!(rec.team_name, "Falcons");
        assert_eq!(rec.extra, vec![("Jersey".to_string(), "42".to_string())]);
        assert_eq!(split_photo_refs(&rec.photos).len(), 2);
    }

    #[test]
    fn missing_required_column_is_structural() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roster.csv");
        fs::write(&path, "First Name,Team\nBrielle,Falcons\n").unwrap();
        let err = Roster::read(
            &path,
            &HeaderAliases::default(),
            &[Field::LastName, Field::FirstName, Field::Photos],
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("LASTNAME"), "got: {msg}");
        assert!(msg.contains("Photo Filenames"), "got: {msg}");
    }

    #[test]
    fn short_rows_are_padded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "A,B,C\n1\n").unwrap();
        let table = Table::read(&path).unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = Table::read(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}

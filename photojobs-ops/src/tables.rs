//! Derived tables and rename plans on disk.
//!
//! Every table is written to `<path>.tmp` and renamed into place, so a
//! reader never sees a half-written file.

use std::path::{Path, PathBuf};

use photojobs_core::roster::DROPPED_COLUMNS;
use photojobs_core::{Field, HeaderAliases, OutputRecord, Table};

use crate::error::{csv_err, io_err, OpsError};
use crate::expand::RenameMapping;

/// Columns appended after the roster's own.
pub const SYNTHESIZED_COLUMNS: [&str; 6] = [
    "NAME",
    "Team File",
    "FILENUMBER",
    "BATCH",
    "PHOTO",
    "NEWFILENAME",
];

// ---------------------------------------------------------------------------
// Derived layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Column {
    Spa,
    Field(Field),
    Extra(String),
    Name,
    TeamFile,
    FileNumber,
    Batch,
    Photo,
    NewFileName,
}

/// Column order of a derived table: `SPA`, the roster's columns (aliases
/// renamed, dropped columns removed), then [`SYNTHESIZED_COLUMNS`].
#[derive(Debug, Clone)]
pub struct DerivedLayout {
    columns: Vec<Column>,
}

impl DerivedLayout {
    pub fn from_headers(headers: &[String], aliases: &HeaderAliases) -> Self {
        let mut columns = vec![Column::Spa];
        for header in headers {
            if DROPPED_COLUMNS.contains(&header.as_str()) {
                continue;
            }
            let column = match aliases.field_for(header) {
                Some(Field::Photos) => continue,
                Some(field) => Column::Field(field),
                None => Column::Extra(header.clone()),
            };
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns.extend([
            Column::Name,
            Column::TeamFile,
            Column::FileNumber,
            Column::Batch,
            Column::Photo,
            Column::NewFileName,
        ]);
        Self { columns }
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| match c {
                Column::Spa => "SPA".to_string(),
                Column::Field(field) => field.header().to_string(),
                Column::Extra(header) => header.clone(),
                Column::Name => SYNTHESIZED_COLUMNS[0].to_string(),
                Column::TeamFile => SYNTHESIZED_COLUMNS[1].to_string(),
                Column::FileNumber => SYNTHESIZED_COLUMNS[2].to_string(),
                Column::Batch => SYNTHESIZED_COLUMNS[3].to_string(),
                Column::Photo => SYNTHESIZED_COLUMNS[4].to_string(),
                Column::NewFileName => SYNTHESIZED_COLUMNS[5].to_string(),
            })
            .collect()
    }

    pub fn row(&self, record: &OutputRecord) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| match c {
                Column::Spa | Column::NewFileName => record.spa.clone(),
                Column::Field(field) => field_value(record, *field).to_string(),
                Column::Extra(header) => record.extra(header).unwrap_or_default().to_string(),
                Column::Name => record.display_name(),
                Column::TeamFile => match record.team_name.trim() {
                    "" => String::new(),
                    team => format!("{team}.psb"),
                },
                Column::FileNumber => record.file_number.to_string(),
                Column::Batch => record.batch.to_string(),
                Column::Photo => record.photo.clone(),
            })
            .collect()
    }
}

fn field_value(record: &OutputRecord, field: Field) -> &str {
    match field {
        Field::LastName => &record.last_name,
        Field::FirstName => &record.first_name,
        Field::TeamName => &record.team_name,
        Field::Grade => &record.grade,
        Field::Number => &record.number,
        Field::Photos => &record.photo,
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn write_atomic(
    path: &Path,
    delimiter: u8,
    headers: Option<&[String]>,
    rows: impl IntoIterator<Item = Vec<String>>,
) -> Result<(), OpsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = tmp_path(path);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(&tmp)
        .map_err(|e| csv_err(&tmp, e))?;
    if let Some(headers) = headers {
        writer.write_record(headers).map_err(|e| csv_err(&tmp, e))?;
    }
    for row in rows {
        writer.write_record(&row).map_err(|e| csv_err(&tmp, e))?;
    }
    writer.flush().map_err(|e| io_err(&tmp, e))?;
    drop(writer);

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    tracing::info!("wrote: {}", path.display());
    Ok(())
}

/// Write `records` under `layout`, stably sorted by SPA.
pub fn write_derived_table(
    path: &Path,
    layout: &DerivedLayout,
    records: &[&OutputRecord],
) -> Result<(), OpsError> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.spa.cmp(&b.spa));
    let headers = layout.headers();
    write_atomic(
        path,
        b',',
        Some(&headers),
        sorted.into_iter().map(|r| layout.row(r)),
    )
}

/// Tab-separated `PHOTO<TAB>SPA-stem`, sorted by SPA, no header.
pub fn write_rename_plan(path: &Path, records: &[&OutputRecord]) -> Result<(), OpsError> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.spa.cmp(&b.spa));
    write_atomic(
        path,
        b'\t',
        None,
        sorted.into_iter().map(|r| {
            let stem = Path::new(&r.spa)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| r.spa.clone());
            vec![r.photo.clone(), stem]
        }),
    )
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Read a rename plan.
///
/// `.csv` files need `PHOTO` and `NEWFILENAME` columns; anything else is
/// read as two tab-separated columns, with an optional `PHOTO` header line.
pub fn read_rename_plan(path: &Path) -> Result<RenameMapping, OpsError> {
    let is_csv = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let mapping = if is_csv {
        read_csv_plan(path)?
    } else {
        read_tsv_plan(path)?
    };
    if mapping.is_empty() {
        return Err(OpsError::Empty {
            path: path.to_path_buf(),
            what: "rename entries",
        });
    }
    Ok(mapping)
}

fn read_csv_plan(path: &Path) -> Result<RenameMapping, OpsError> {
    let table = Table::read(path)?;
    table.require(&["PHOTO", "NEWFILENAME"])?;
    let (Some(photo), Some(dest)) = (table.column("PHOTO"), table.column("NEWFILENAME")) else {
        return Err(table.missing_columns(&["PHOTO", "NEWFILENAME"]).into());
    };
    Ok(table
        .rows
        .iter()
        .map(|row| (row[photo].as_str(), row[dest].as_str()))
        .collect())
}

fn read_tsv_plan(path: &Path) -> Result<RenameMapping, OpsError> {
    if !path.is_file() {
        return Err(photojobs_core::CoreError::NotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;

    let mut mapping = RenameMapping::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_err(path, e))?;
        let (Some(source), Some(dest)) = (record.get(0), record.get(1)) else {
            continue;
        };
        let source = source.trim_start_matches('\u{feff}');
        if i == 0 && source.trim().eq_ignore_ascii_case("PHOTO") {
            continue;
        }
        mapping.insert(source, dest);
    }
    Ok(mapping)
}

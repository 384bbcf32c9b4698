//! CSV dataset loading.
//!
//! Three input shapes:
//!
//! - TA dataset: `ta_id,name,max_assigned` followed by one preference
//!   column per section, in section order (cells `P`/`W`/`U`/empty).
//! - Section dataset: any header containing `section`, `daytime` and
//!   `min_ta`; extra columns are ignored.
//! - Fixture matrix: headerless 0/1 grid, one row per TA.
//!
//! All loaders parse from any `Read`, with path-taking wrappers for the
//! CLI. Malformed input surfaces as [`LoadError`] and aborts the run.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::models::{AssignmentMatrix, Preference, Section, Ta};

/// Dataset loading failure.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column {0:?}")]
    MissingColumn(&'static str),
    #[error("row {row}: {message}")]
    BadValue { row: usize, message: String },
}

impl LoadError {
    fn bad_value(row: usize, message: impl Into<String>) -> Self {
        LoadError::BadValue {
            row,
            message: message.into(),
        }
    }
}

/// Loads the TA dataset from a CSV file.
pub fn load_tas(path: impl AsRef<Path>) -> Result<Vec<Ta>, LoadError> {
    read_tas(File::open(path)?)
}

/// Parses the TA dataset from a reader.
pub fn read_tas<R: Read>(reader: R) -> Result<Vec<Ta>, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for (index, expected) in ["ta_id", "name", "max_assigned"].iter().enumerate() {
        if headers.get(index).map(str::trim) != Some(*expected) {
            return Err(LoadError::MissingColumn(expected));
        }
    }

    let mut tas = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let id = field(&record, 0, row)?;
        let name = field(&record, 1, row)?;
        let max_assigned: u32 = field(&record, 2, row)?
            .parse()
            .map_err(|_| LoadError::bad_value(row, "max_assigned is not a count"))?;

        let mut preferences = Vec::with_capacity(record.len().saturating_sub(3));
        for cell in record.iter().skip(3) {
            let preference: Preference = cell
                .parse()
                .map_err(|e: String| LoadError::bad_value(row, e))?;
            preferences.push(preference);
        }

        tas.push(
            Ta::new(id, max_assigned)
                .with_name(name)
                .with_preferences(preferences),
        );
    }
    Ok(tas)
}

/// Loads the section dataset from a CSV file.
pub fn load_sections(path: impl AsRef<Path>) -> Result<Vec<Section>, LoadError> {
    read_sections(File::open(path)?)
}

/// Parses the section dataset from a reader.
pub fn read_sections<R: Read>(reader: R) -> Result<Vec<Section>, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let id_col = column("section")?;
    let daytime_col = column("daytime")?;
    let min_ta_col = column("min_ta")?;

    let mut sections = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let min_ta: u32 = field(&record, min_ta_col, row)?
            .parse()
            .map_err(|_| LoadError::bad_value(row, "min_ta is not a count"))?;
        sections.push(Section::new(
            field(&record, id_col, row)?,
            field(&record, daytime_col, row)?,
            min_ta,
        ));
    }
    Ok(sections)
}

/// Loads a headerless 0/1 fixture matrix from a CSV file.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<AssignmentMatrix, LoadError> {
    read_matrix(File::open(path)?)
}

/// Parses a headerless 0/1 grid from a reader.
///
/// Cells are numeric; any non-zero value counts as assigned, matching
/// the float grids numeric tooling tends to emit.
pub fn read_matrix<R: Read>(reader: R) -> Result<AssignmentMatrix, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: Vec<Vec<bool>> = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let mut cells = Vec::with_capacity(record.len());
        for cell in record.iter() {
            let value: f64 = cell
                .trim()
                .parse()
                .map_err(|_| LoadError::bad_value(row, format!("non-numeric cell {cell:?}")))?;
            cells.push(value != 0.0);
        }
        if let Some(first) = rows.first() {
            if cells.len() != first.len() {
                return Err(LoadError::bad_value(row, "ragged matrix row"));
            }
        }
        rows.push(cells);
    }
    Ok(AssignmentMatrix::from_rows(rows))
}

fn field<'a>(record: &'a csv::StringRecord, index: usize, row: usize) -> Result<&'a str, LoadError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| LoadError::bad_value(row, format!("missing field {index}")))
}

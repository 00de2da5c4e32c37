//! CSV Data Loader Module
//! Reads a survey export into a `SurveyTable`, one row per respondent.

use crate::data::table::{SurveyTable, TableError};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Row {row} (line {line}) has {found} fields, header has {expected}")]
    FieldCount {
        row: u64,
        line: u64,
        expected: u64,
        found: u64,
    },
    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Failed to build table: {0}")]
    TableError(#[from] TableError),
}

/// Handles survey CSV loading.
pub struct DataLoader;

impl DataLoader {
    /// Load a comma-separated file with a header row.
    ///
    /// The file is opened, fully read and closed before this returns.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<SurveyTable, LoaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            rows = table.height(),
            columns = table.width(),
            "Survey loaded"
        );
        Ok(table)
    }

    /// Parse CSV text from any reader.
    ///
    /// Every row must have as many fields as the header. Empty fields become
    /// missing cells; everything else is kept verbatim as text.
    pub fn from_reader<R: Read>(reader: R) -> Result<SurveyTable, LoaderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        for result in rdr.records() {
            let record = result.map_err(Self::classify)?;
            for (column, field) in columns.iter_mut().zip(record.iter()) {
                column.push(if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                });
            }
        }

        debug!(columns = headers.len(), "CSV parsed");
        Ok(SurveyTable::from_columns(&headers, columns)?)
    }

    /// Turn the reader's length mismatch into a row-addressed error.
    fn classify(err: csv::Error) -> LoaderError {
        if let csv::ErrorKind::UnequalLengths {
            pos: Some(pos),
            expected_len,
            len,
        } = err.kind()
        {
            // Record 0 is the header, so the record index is the data-row position.
            return LoaderError::FieldCount {
                row: pos.record(),
                line: pos.line(),
                expected: *expected_len,
                found: *len,
            };
        }
        LoaderError::CsvError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellValue;

    #[test]
    fn test_loads_header_and_rows() {
        let csv = "name,score\nana,5\nluis,\n";
        let table = DataLoader::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.column_names(), vec!["name", "score"]);
        assert_eq!(table.height(), 2);
        assert_eq!(
            table.values("score").unwrap(),
            vec![Some(CellValue::from("5")), None]
        );
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let csv = "\"Cuando compra pan, ¿Qué prefiere usted?\"\n\"Pan granel, fresco\"\n";
        let table = DataLoader::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["Cuando compra pan, ¿Qué prefiere usted?"]
        );
        assert_eq!(
            table.values("Cuando compra pan, ¿Qué prefiere usted?").unwrap(),
            vec![Some(CellValue::from("Pan granel, fresco"))]
        );
    }

    #[test]
    fn test_short_row_fails_with_position() {
        let csv = "a,b,c\n1,2,3\n4,5\n";
        let err = DataLoader::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            LoaderError::FieldCount {
                row,
                line,
                expected,
                found,
            } => {
                assert_eq!(row, 2);
                assert_eq!(line, 3);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = DataLoader::load_csv("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.csv"));
    }

    #[test]
    fn test_duplicate_header_is_rejected() {
        let csv = "a,a\n1,2\n";
        assert!(matches!(
            DataLoader::from_reader(csv.as_bytes()),
            Err(LoaderError::TableError(_))
        ));
    }
}

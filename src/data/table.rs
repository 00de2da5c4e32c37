//! Survey Table Module
//! In-memory survey export backed by a Polars DataFrame.

use polars::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// A single non-missing cell. Missing cells are `None` wherever values are
/// handed out.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellValue {
    Int(i64),
    Text(String),
}

impl CellValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

/// Ordered respondents keyed by question label.
///
/// Columns hold raw text (`String`) or coerced integers (`Int64`); a null is
/// the missing marker. Every transformation hands back a new table.
#[derive(Debug, Clone)]
pub struct SurveyTable {
    df: DataFrame,
}

impl SurveyTable {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    /// Build a text table from column-major data. Column order follows `headers`.
    pub fn from_columns(
        headers: &[String],
        columns: Vec<Vec<Option<String>>>,
    ) -> Result<Self, TableError> {
        let columns: Vec<Column> = headers
            .iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name.as_str().into(), values))
            .collect();
        Ok(Self::new(DataFrame::new(columns)?))
    }

    /// Build a text table from row-major data; handy for small fixtures.
    pub fn from_rows(headers: &[&str], rows: &[Vec<Option<&str>>]) -> Result<Self, TableError> {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let mut columns: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(rows.len()); headers.len()];
        for row in rows {
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(row.get(i).copied().flatten().map(str::to_string));
            }
        }
        Self::from_columns(&headers, columns)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Number of respondents.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Look up a column, failing with `ColumnNotFound` when absent.
    pub fn require(&self, name: &str) -> Result<&Column, TableError> {
        self.df
            .column(name)
            .map_err(|_| TableError::ColumnNotFound(name.to_string()))
    }

    /// Whether the column has been coerced to integers.
    pub fn is_numeric(&self, name: &str) -> Result<bool, TableError> {
        Ok(self.require(name)?.dtype().is_integer())
    }

    /// Cell values of a column in row order, `None` for missing cells.
    pub fn values(&self, name: &str) -> Result<Vec<Option<CellValue>>, TableError> {
        let column = self.require(name)?;
        let values = match column.dtype() {
            DataType::Int64 => column
                .i64()?
                .into_iter()
                .map(|v| v.map(CellValue::Int))
                .collect(),
            DataType::String => column
                .str()?
                .into_iter()
                .map(|v| v.map(|s| CellValue::Text(s.to_string())))
                .collect(),
            _ => {
                let cast = column.cast(&DataType::String)?;
                cast.str()?
                    .into_iter()
                    .map(|v| v.map(|s| CellValue::Text(s.to_string())))
                    .collect()
            }
        };
        Ok(values)
    }

    /// Raw text of a column, `None` for missing cells. Integer columns are
    /// rendered back as numerals.
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<String>>, TableError> {
        Ok(self
            .values(name)?
            .into_iter()
            .map(|v| v.map(|v| v.to_string()))
            .collect())
    }

    /// Copy of this table with `column` replacing the one of the same name.
    pub(crate) fn replace_column(&self, column: Column) -> Result<Self, TableError> {
        let mut df = self.df.clone();
        df.with_column(column)?;
        Ok(Self::new(df))
    }

    /// Copy of this table keeping only rows whose mask entry is `true`.
    pub(crate) fn keep_rows(&self, mask: &[bool]) -> Result<Self, TableError> {
        let mask = BooleanChunked::from_slice(PlSmallStr::EMPTY, mask);
        Ok(Self::new(self.df.filter(&mask)?))
    }
}

impl PartialEq for SurveyTable {
    fn eq(&self, other: &Self) -> bool {
        self.df.equals_missing(&other.df)
    }
}

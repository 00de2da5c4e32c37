//! Data Processor Module
//! Handles survey cleaning: numeric coercion, whitespace trimming and
//! respondent filtering. Every operation returns a new table.

use crate::data::table::{SurveyTable, TableError};
use polars::prelude::*;
use tracing::debug;

/// Handles data cleaning operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Parse an integer literal, tolerating surrounding whitespace.
    pub fn parse_integer(text: &str) -> Option<i64> {
        text.trim().parse::<i64>().ok()
    }

    /// Replace every value of `column` by its integer interpretation.
    ///
    /// Text that is not a valid integer literal becomes missing, never zero.
    pub fn coerce_numeric(table: &SurveyTable, column: &str) -> Result<SurveyTable, TableError> {
        let text = table.text_values(column)?;
        let coerced: Vec<Option<i64>> = text
            .iter()
            .map(|v| v.as_deref().and_then(Self::parse_integer))
            .collect();

        let rejected = text
            .iter()
            .zip(&coerced)
            .filter(|(raw, num)| raw.is_some() && num.is_none())
            .count();
        debug!(column, rejected, "Numeric coercion applied");

        table.replace_column(Column::new(column.into(), coerced))
    }

    /// Strip surrounding whitespace from every text value of `column`.
    ///
    /// Values that are blank after trimming become missing.
    pub fn trim_whitespace(table: &SurveyTable, column: &str) -> Result<SurveyTable, TableError> {
        if table.is_numeric(column)? {
            return Ok(table.clone());
        }
        let trimmed: Vec<Option<String>> = table
            .text_values(column)?
            .into_iter()
            .map(|v| {
                v.map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .collect();
        table.replace_column(Column::new(column.into(), trimmed))
    }

    /// Keep rows whose trimmed `column` value equals `literal` exactly
    /// (case-sensitive). Rows missing that value are dropped.
    pub fn filter_equals(
        table: &SurveyTable,
        column: &str,
        literal: &str,
    ) -> Result<SurveyTable, TableError> {
        let mask: Vec<bool> = table
            .text_values(column)?
            .iter()
            .map(|v| v.as_deref().is_some_and(|s| s.trim() == literal))
            .collect();

        let filtered = table.keep_rows(&mask)?;
        debug!(
            column,
            literal,
            kept = filtered.height(),
            total = table.height(),
            "Filter applied"
        );
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellValue;

    fn survey() -> SurveyTable {
        SurveyTable::from_rows(
            &["consume", "importance", "family"],
            &[
                vec![Some("Si"), Some("5"), Some(" 3 ")],
                vec![Some("No"), Some("abc"), Some("Más de 3")],
                vec![Some(" Si "), Some(" 4 "), None],
                vec![Some("si"), Some("2"), Some("2")],
                vec![None, Some("-1"), Some("1")],
                vec![Some("Si"), None, Some("   ")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(DataProcessor::parse_integer(" 42 "), Some(42));
        assert_eq!(DataProcessor::parse_integer("-7"), Some(-7));
        assert_eq!(DataProcessor::parse_integer("4.5"), None);
        assert_eq!(DataProcessor::parse_integer(""), None);
    }

    #[test]
    fn test_coerce_numeric_marks_invalid_as_missing() {
        let coerced = DataProcessor::coerce_numeric(&survey(), "importance").unwrap();
        assert!(coerced.is_numeric("importance").unwrap());
        assert_eq!(
            coerced.values("importance").unwrap(),
            vec![
                Some(CellValue::Int(5)),
                None,
                Some(CellValue::Int(4)),
                Some(CellValue::Int(2)),
                Some(CellValue::Int(-1)),
                None,
            ]
        );
        // other columns untouched
        assert_eq!(
            coerced.values("family").unwrap(),
            survey().values("family").unwrap()
        );
    }

    #[test]
    fn test_coerce_then_format_reproduces_numeral() {
        for literal in ["0", "5", "-12", " 300 "] {
            let table = SurveyTable::from_rows(&["n"], &[vec![Some(literal)]]).unwrap();
            let coerced = DataProcessor::coerce_numeric(&table, "n").unwrap();
            assert_eq!(
                coerced.text_values("n").unwrap(),
                vec![Some(literal.trim().to_string())]
            );
        }
    }

    #[test]
    fn test_filter_equals_trims_and_is_case_sensitive() {
        let filtered = DataProcessor::filter_equals(&survey(), "consume", "Si").unwrap();
        assert_eq!(filtered.height(), 3);
        assert_eq!(
            filtered.text_values("importance").unwrap(),
            vec![Some("5".to_string()), Some(" 4 ".to_string()), None]
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = DataProcessor::filter_equals(&survey(), "consume", "Si").unwrap();
        let twice = DataProcessor::filter_equals(&once, "consume", "Si").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_trim_whitespace() {
        let trimmed = DataProcessor::trim_whitespace(&survey(), "family").unwrap();
        assert_eq!(
            trimmed.text_values("family").unwrap(),
            vec![
                Some("3".to_string()),
                Some("Más de 3".to_string()),
                None,
                Some("2".to_string()),
                Some("1".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_unknown_column() {
        assert!(matches!(
            DataProcessor::filter_equals(&survey(), "edad", "Si"),
            Err(TableError::ColumnNotFound(_))
        ));
        assert!(matches!(
            DataProcessor::coerce_numeric(&survey(), "edad"),
            Err(TableError::ColumnNotFound(_))
        ));
    }
}

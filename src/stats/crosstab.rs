//! Cross-Tabulation Module
//! Contingency counts between two categorical survey columns.

use crate::data::{CellValue, SurveyTable, TableError};
use std::collections::HashMap;

/// Counts for every (row value, column value) pair seen together.
///
/// Row labels are in natural ascending order, column labels in the order
/// they were first seen. Pairs never observed count as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub row_column: String,
    pub col_column: String,
    row_labels: Vec<CellValue>,
    col_labels: Vec<CellValue>,
    cells: HashMap<(CellValue, CellValue), usize>,
}

impl CrossTab {
    pub fn row_labels(&self) -> &[CellValue] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[CellValue] {
        &self.col_labels
    }

    pub fn count(&self, row: &CellValue, col: &CellValue) -> usize {
        self.cells
            .get(&(row.clone(), col.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Dense grid, rows then columns, following the label order.
    pub fn dense(&self) -> Vec<Vec<usize>> {
        self.row_labels
            .iter()
            .map(|r| self.col_labels.iter().map(|c| self.count(r, c)).collect())
            .collect()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.dense().iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<usize> {
        let grid = self.dense();
        (0..self.col_labels.len())
            .map(|j| grid.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Rows with both values present.
    pub fn total(&self) -> usize {
        self.cells.values().sum()
    }

    pub fn max_count(&self) -> usize {
        self.cells.values().copied().max().unwrap_or(0)
    }
}

/// Cross-tabulate `row_column` against `col_column`, skipping rows where
/// either value is missing.
pub fn cross_tabulate(
    table: &SurveyTable,
    row_column: &str,
    col_column: &str,
) -> Result<CrossTab, TableError> {
    let rows = table.values(row_column)?;
    let cols = table.values(col_column)?;

    let mut cells: HashMap<(CellValue, CellValue), usize> = HashMap::new();
    let mut row_labels: Vec<CellValue> = Vec::new();
    let mut col_labels: Vec<CellValue> = Vec::new();

    for (r, c) in rows.into_iter().zip(cols) {
        let (Some(r), Some(c)) = (r, c) else {
            continue;
        };
        if !row_labels.contains(&r) {
            row_labels.push(r.clone());
        }
        if !col_labels.contains(&c) {
            col_labels.push(c.clone());
        }
        *cells.entry((r, c)).or_insert(0) += 1;
    }
    row_labels.sort();

    Ok(CrossTab {
        row_column: row_column.to_string(),
        col_column: col_column.to_string(),
        row_labels,
        col_labels,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataProcessor;
    use crate::stats::{frequency_table, FrequencyOrder};

    fn survey(rows: &[(Option<&str>, Option<&str>)]) -> SurveyTable {
        let rows: Vec<Vec<Option<&str>>> = rows.iter().map(|(a, b)| vec![*a, *b]).collect();
        let table = SurveyTable::from_rows(&["frecuencia", "importancia"], &rows).unwrap();
        DataProcessor::coerce_numeric(&table, "importancia").unwrap()
    }

    #[test]
    fn test_cells_and_implicit_zero() {
        let table = survey(&[
            (Some("Daily"), Some("5")),
            (Some("Daily"), Some("4")),
            (Some("Weekly"), Some("5")),
        ]);
        let ct = cross_tabulate(&table, "frecuencia", "importancia").unwrap();

        let daily = CellValue::from("Daily");
        let weekly = CellValue::from("Weekly");
        assert_eq!(ct.count(&daily, &CellValue::Int(5)), 1);
        assert_eq!(ct.count(&daily, &CellValue::Int(4)), 1);
        assert_eq!(ct.count(&weekly, &CellValue::Int(5)), 1);
        assert_eq!(ct.count(&weekly, &CellValue::Int(4)), 0);
        assert_eq!(ct.row_labels(), &[daily, weekly]);
        assert_eq!(ct.col_labels(), &[CellValue::Int(5), CellValue::Int(4)]);
        assert_eq!(ct.dense(), vec![vec![1, 1], vec![1, 0]]);
        assert_eq!(ct.total(), 3);
    }

    #[test]
    fn test_margins_match_frequency_tables() {
        let table = survey(&[
            (Some("Diario"), Some("5")),
            (Some("Semanal"), Some("3")),
            (Some("Diario"), Some("4")),
            (Some("Ocasional"), Some("1")),
            (Some("Diario"), Some("5")),
            (Some("Semanal"), Some("5")),
        ]);
        let ct = cross_tabulate(&table, "frecuencia", "importancia").unwrap();

        let rows = frequency_table(&table, "frecuencia", FrequencyOrder::ByValueAscending).unwrap();
        assert_eq!(ct.row_totals(), rows.counts());

        let cols =
            frequency_table(&table, "importancia", FrequencyOrder::InsertionOfFirstOccurrence)
                .unwrap();
        assert_eq!(ct.col_totals(), cols.counts());
        assert_eq!(ct.total(), 6);
    }

    #[test]
    fn test_rows_missing_either_value_are_skipped() {
        let table = survey(&[
            (Some("Diario"), Some("5")),
            (None, Some("4")),
            (Some("Semanal"), Some("n/a")),
            (Some("Semanal"), None),
        ]);
        let ct = cross_tabulate(&table, "frecuencia", "importancia").unwrap();
        assert_eq!(ct.total(), 1);
        assert_eq!(ct.row_labels(), &[CellValue::from("Diario")]);
        assert_eq!(ct.col_labels(), &[CellValue::Int(5)]);
    }

    #[test]
    fn test_numeric_rows_sorted_numerically() {
        let table = survey(&[
            (Some("Diario"), Some("10")),
            (Some("Diario"), Some("2")),
        ]);
        let ct = cross_tabulate(&table, "importancia", "frecuencia").unwrap();
        assert_eq!(ct.row_labels(), &[CellValue::Int(2), CellValue::Int(10)]);
    }

    #[test]
    fn test_unknown_column() {
        let table = survey(&[(Some("Diario"), Some("5"))]);
        let err = cross_tabulate(&table, "frecuencia", "marca").unwrap_err();
        assert!(matches!(err, TableError::ColumnNotFound(ref c) if c == "marca"));
    }
}

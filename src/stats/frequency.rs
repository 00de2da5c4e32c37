//! Frequency Table Module
//! Value counts over a single survey column.

use crate::data::{CellValue, SurveyTable, TableError};
use std::collections::HashMap;

/// Ordering of the (value, count) pairs of a frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyOrder {
    /// Natural value order: numeric for coerced columns, lexical otherwise.
    ByValueAscending,
    /// Order in which each value was first seen in the row scan.
    InsertionOfFirstOccurrence,
    /// Highest count first, ties in first-occurrence order.
    #[default]
    ByCountDescending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    pub column: String,
    pub order: FrequencyOrder,
    entries: Vec<(CellValue, usize)>,
}

impl FrequencyTable {
    pub fn entries(&self) -> &[(CellValue, usize)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellValue, usize)> {
        self.entries.iter().map(|(v, c)| (v, *c))
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(v, _)| v.to_string()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, c)| *c).collect()
    }

    pub fn get(&self, value: &CellValue) -> Option<usize> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, c)| *c)
    }

    /// Number of non-missing values counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Percentage of the total held by `value`, 0 when absent.
    pub fn share(&self, value: &CellValue) -> f64 {
        let total = self.total();
        match self.get(value) {
            Some(count) if total > 0 => count as f64 * 100.0 / total as f64,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.entries.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count values in first-occurrence order, skipping missing cells.
pub(crate) fn count_in_scan_order(values: Vec<Option<CellValue>>) -> Vec<(CellValue, usize)> {
    let mut index: HashMap<CellValue, usize> = HashMap::new();
    let mut entries: Vec<(CellValue, usize)> = Vec::new();

    for value in values.into_iter().flatten() {
        match index.get(&value) {
            Some(&i) => entries[i].1 += 1,
            None => {
                index.insert(value.clone(), entries.len());
                entries.push((value, 1));
            }
        }
    }
    entries
}

/// Build the frequency table of `column`.
pub fn frequency_table(
    table: &SurveyTable,
    column: &str,
    order: FrequencyOrder,
) -> Result<FrequencyTable, TableError> {
    let mut entries = count_in_scan_order(table.values(column)?);

    match order {
        FrequencyOrder::ByValueAscending => entries.sort_by(|a, b| a.0.cmp(&b.0)),
        FrequencyOrder::InsertionOfFirstOccurrence => {}
        // stable sort keeps first-occurrence order among equal counts
        FrequencyOrder::ByCountDescending => entries.sort_by(|a, b| b.1.cmp(&a.1)),
    }

    Ok(FrequencyTable {
        column: column.to_string(),
        order,
        entries,
    })
}

/// Most common value of `column`; ties go to the value seen first in the
/// row scan. `None` when every cell is missing.
pub fn most_frequent(table: &SurveyTable, column: &str) -> Result<Option<CellValue>, TableError> {
    let entries = count_in_scan_order(table.values(column)?);

    let mut best: Option<(CellValue, usize)> = None;
    for (value, count) in entries {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    Ok(best.map(|(value, _)| value))
}

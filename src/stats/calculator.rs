//! Statistics Calculator Module
//! Descriptive statistics and per-column profiles of the survey table.

use crate::data::{CellValue, SurveyTable, TableError};
use crate::stats::frequency::count_in_scan_order;
use statrs::statistics::Statistics;

/// Descriptive statistics for an integer column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for NumericSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Overview of one column: completeness, cardinality and dominant answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub unique: usize,
    pub top: Option<CellValue>,
    pub top_freq: usize,
    pub numeric: Option<NumericSummary>,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> NumericSummary {
        let n = values.len();
        if n == 0 {
            return NumericSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // sample standard deviation, 0 for a single observation
        let std = if n > 1 { values.std_dev() } else { 0.0 };

        NumericSummary {
            count: n,
            mean: values.mean(),
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Non-missing integer values of a column as floats.
    pub fn numeric_values(table: &SurveyTable, column: &str) -> Result<Vec<f64>, TableError> {
        Ok(table
            .values(column)?
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_int())
            .map(|v| v as f64)
            .collect())
    }

    /// Mean of an integer column, `None` when it holds no numbers.
    pub fn mean_of(table: &SurveyTable, column: &str) -> Result<Option<f64>, TableError> {
        let values = Self::numeric_values(table, column)?;
        Ok((!values.is_empty()).then(|| values.as_slice().mean()))
    }

    pub fn profile_column(table: &SurveyTable, column: &str) -> Result<ColumnProfile, TableError> {
        let values = table.values(column)?;
        let missing = values.iter().filter(|v| v.is_none()).count();
        let count = values.len() - missing;

        let counts = count_in_scan_order(values);
        let top = counts
            .iter()
            .fold(None::<&(CellValue, usize)>, |best, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            });

        let numeric = if table.is_numeric(column)? {
            Some(Self::compute_descriptive_stats(&Self::numeric_values(
                table, column,
            )?))
        } else {
            None
        };

        Ok(ColumnProfile {
            name: column.to_string(),
            count,
            missing,
            unique: counts.len(),
            top: top.map(|(v, _)| v.clone()),
            top_freq: top.map(|(_, c)| *c).unwrap_or(0),
            numeric,
        })
    }

    /// Profile every column, in table order.
    pub fn profile_table(table: &SurveyTable) -> Result<Vec<ColumnProfile>, TableError> {
        table
            .column_names()
            .iter()
            .map(|name| Self::profile_column(table, name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataProcessor;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_descriptive_stats() {
        let s = StatsCalculator::compute_descriptive_stats(&[5.0, 5.0, 4.0, 3.0, 5.0, 2.0]);
        assert_eq!(s.count, 6);
        assert!(approx(s.mean, 4.0));
        assert!(approx(s.std, 1.2649110640673518));
        assert!(approx(s.min, 2.0));
        assert!(approx(s.p25, 3.25));
        assert!(approx(s.median, 4.5));
        assert!(approx(s.p75, 5.0));
        assert!(approx(s.max, 5.0));
    }

    #[test]
    fn test_descriptive_stats_edge_cases() {
        assert!(StatsCalculator::compute_descriptive_stats(&[]).mean.is_nan());
        let single = StatsCalculator::compute_descriptive_stats(&[3.0]);
        assert_eq!(single.std, 0.0);
        assert_eq!(single.median, 3.0);
    }

    #[test]
    fn test_profile_column() {
        let table = SurveyTable::from_rows(
            &["marca", "importancia"],
            &[
                vec![Some("Ideal"), Some("5")],
                vec![Some("Castaño"), Some("x")],
                vec![Some("Castaño"), Some("3")],
                vec![None, Some("4")],
                vec![Some("Ideal"), None],
            ],
        )
        .unwrap();
        let table = DataProcessor::coerce_numeric(&table, "importancia").unwrap();

        let marca = StatsCalculator::profile_column(&table, "marca").unwrap();
        assert_eq!(marca.count, 4);
        assert_eq!(marca.missing, 1);
        assert_eq!(marca.unique, 2);
        assert_eq!(marca.top, Some("Ideal".into()));
        assert_eq!(marca.top_freq, 2);
        assert!(marca.numeric.is_none());

        let imp = StatsCalculator::profile_column(&table, "importancia").unwrap();
        assert_eq!(imp.missing, 2);
        let summary = imp.numeric.unwrap();
        assert_eq!(summary.count, 3);
        assert!(approx(summary.mean, 4.0));

        assert_eq!(StatsCalculator::profile_table(&table).unwrap().len(), 2);
        assert_eq!(
            StatsCalculator::mean_of(&table, "importancia").unwrap(),
            Some(4.0)
        );
    }
}

//! Stats module - Frequency tables, cross-tabulations and descriptive statistics

mod calculator;
mod crosstab;
mod frequency;

pub use calculator::{ColumnProfile, NumericSummary, StatsCalculator};
pub use crosstab::{cross_tabulate, CrossTab};
pub use frequency::{frequency_table, most_frequent, FrequencyOrder, FrequencyTable};

//! Collection Period Module
//! Best-effort first/last response time from the survey timestamp column.

use crate::data::table::SurveyTable;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;
use tracing::warn;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Why a collection period could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    MissingColumn(String),
    NoValues,
    Unparseable { value: String },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::MissingColumn(c) => write!(f, "column '{}' not present", c),
            UnavailableReason::NoValues => f.write_str("no timestamps recorded"),
            UnavailableReason::Unparseable { value } => {
                write!(f, "unrecognised timestamp '{}'", value)
            }
        }
    }
}

/// Outcome of the optional timestamp analysis. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionPeriod {
    Available {
        first: NaiveDateTime,
        last: NaiveDateTime,
    },
    Unavailable(UnavailableReason),
}

impl CollectionPeriod {
    pub fn is_available(&self) -> bool {
        matches!(self, CollectionPeriod::Available { .. })
    }
}

/// Parse a single timestamp in one of the accepted layouts.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Earliest and latest timestamp in `column`.
///
/// All-or-nothing: a single value that fails to parse makes the whole
/// period unavailable. Missing cells are skipped.
pub fn collection_period(table: &SurveyTable, column: &str) -> CollectionPeriod {
    let Ok(values) = table.text_values(column) else {
        warn!(column, "Timestamp column not present");
        return CollectionPeriod::Unavailable(UnavailableReason::MissingColumn(
            column.to_string(),
        ));
    };

    let mut range: Option<(NaiveDateTime, NaiveDateTime)> = None;
    for value in values.into_iter().flatten() {
        let Some(ts) = parse_timestamp(&value) else {
            warn!(column, value = %value, "Timestamp not recognised");
            return CollectionPeriod::Unavailable(UnavailableReason::Unparseable { value });
        };
        range = Some(match range {
            None => (ts, ts),
            Some((first, last)) => (first.min(ts), last.max(ts)),
        });
    }

    match range {
        Some((first, last)) => CollectionPeriod::Available { first, last },
        None => CollectionPeriod::Unavailable(UnavailableReason::NoValues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[Option<&str>]) -> SurveyTable {
        let rows: Vec<Vec<Option<&str>>> = values.iter().map(|v| vec![*v]).collect();
        SurveyTable::from_rows(&["Marca temporal"], &rows).unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_accepted_layouts() {
        assert_eq!(
            parse_timestamp("2024/05/10 10:23:45"),
            Some(dt("2024-05-10 10:23:45"))
        );
        assert_eq!(
            parse_timestamp("2024-05-10T10:23:45Z"),
            Some(dt("2024-05-10 10:23:45"))
        );
        assert_eq!(parse_timestamp("10/05/2024"), Some(dt("2024-05-10 00:00:00")));
        assert_eq!(parse_timestamp("ayer"), None);
    }

    #[test]
    fn test_period_spans_min_and_max() {
        let t = table(&[
            Some("2024/05/12 09:00:00"),
            None,
            Some("2024/05/10 18:30:00"),
            Some("2024/05/11 12:00:00"),
        ]);
        assert_eq!(
            collection_period(&t, "Marca temporal"),
            CollectionPeriod::Available {
                first: dt("2024-05-10 18:30:00"),
                last: dt("2024-05-12 09:00:00"),
            }
        );
    }

    #[test]
    fn test_one_bad_value_makes_period_unavailable() {
        let t = table(&[
            Some("2024/05/12 09:00:00"),
            Some("2024/05/12 9:00:00 p. m. GMT-4"),
        ]);
        let period = collection_period(&t, "Marca temporal");
        assert!(!period.is_available());
        assert!(matches!(
            period,
            CollectionPeriod::Unavailable(UnavailableReason::Unparseable { .. })
        ));
    }

    #[test]
    fn test_missing_column_and_empty_column() {
        let t = table(&[None, None]);
        assert_eq!(
            collection_period(&t, "Fecha"),
            CollectionPeriod::Unavailable(UnavailableReason::MissingColumn("Fecha".into()))
        );
        assert_eq!(
            collection_period(&t, "Marca temporal"),
            CollectionPeriod::Unavailable(UnavailableReason::NoValues)
        );
    }
}

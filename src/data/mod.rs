//! Data module - CSV loading, cleaning and the survey table

mod loader;
mod processor;
mod table;
mod timestamp;

pub use loader::{DataLoader, LoaderError};
pub use processor::DataProcessor;
pub use table::{CellValue, SurveyTable, TableError};
pub use timestamp::{collection_period, parse_timestamp, CollectionPeriod, UnavailableReason};

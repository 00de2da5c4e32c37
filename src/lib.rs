//! Survey Insights - bread-consumption survey analysis
//!
//! Loads a survey export, cleans it, and aggregates answers into frequency
//! tables and cross-tabulations for console summaries and static charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod report;
pub mod stats;

pub use config::SurveyConfig;
pub use report::SurveyReport;

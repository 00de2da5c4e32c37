//! Survey Report Module
//! Composes load → clean → aggregate into one report value and renders its
//! console summary. Charts are drawn from the same value by `charts`.

use crate::config::SurveyConfig;
use crate::data::{collection_period, CollectionPeriod, DataProcessor, SurveyTable, TableError};
use crate::stats::{
    cross_tabulate, frequency_table, most_frequent, ColumnProfile, CrossTab, FrequencyOrder,
    FrequencyTable, StatsCalculator,
};
use std::fmt;
use tracing::info;

const RULE_WIDTH: usize = 60;

/// How the Presenter should draw a frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
}

/// Frequency table of one survey question among consumers.
#[derive(Debug, Clone)]
pub struct ColumnAnalysis {
    pub key: &'static str,
    pub title: &'static str,
    pub chart: ChartKind,
    pub frequency: FrequencyTable,
}

#[derive(Debug, Clone)]
pub struct CrossTabAnalysis {
    pub key: &'static str,
    pub title: &'static str,
    pub table: CrossTab,
}

/// Most frequent answer of a key question.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub label: &'static str,
    pub value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SurveyReport {
    pub total_respondents: usize,
    pub consumers: usize,
    pub column_count: usize,
    pub profiles: Vec<ColumnProfile>,
    pub analyses: Vec<ColumnAnalysis>,
    pub crosstabs: Vec<CrossTabAnalysis>,
    pub mean_importance: Option<f64>,
    pub highlights: Vec<Highlight>,
    /// `None` when no timestamp column is configured.
    pub period: Option<CollectionPeriod>,
}

impl SurveyReport {
    /// Run the whole analysis over a loaded survey.
    pub fn build(table: &SurveyTable, config: &SurveyConfig) -> Result<Self, TableError> {
        let cleaned = DataProcessor::trim_whitespace(table, &config.family_size)?;
        let cleaned = DataProcessor::coerce_numeric(&cleaned, &config.importance)?;
        let consumers = DataProcessor::filter_equals(&cleaned, &config.consumes, &config.affirmative)?;
        info!(
            respondents = table.height(),
            consumers = consumers.height(),
            "Consumers selected"
        );

        let profiles = StatsCalculator::profile_table(&cleaned)?;

        #[rustfmt::skip]
        let specs: [(&'static str, &'static str, &str, FrequencyOrder, ChartKind); 11] = [
            ("consumption", "Bread consumption", &config.consumes, FrequencyOrder::ByCountDescending, ChartKind::Bar),
            ("family_size", "Household size", &config.family_size, FrequencyOrder::ByCountDescending, ChartKind::Pie),
            ("importance", "Daily importance of bread (1-5)", &config.importance, FrequencyOrder::ByValueAscending, ChartKind::Bar),
            ("frequency", "Consumption frequency", &config.frequency, FrequencyOrder::ByCountDescending, ChartKind::Pie),
            ("bread_type", "Preferred bread type", &config.bread_type, FrequencyOrder::ByCountDescending, ChartKind::Bar),
            ("purchase_location", "Purchase location", &config.purchase_location, FrequencyOrder::ByCountDescending, ChartKind::Bar),
            ("packaged_decision", "Deciding factor for packaged bread", &config.packaged_decision, FrequencyOrder::ByCountDescending, ChartKind::Bar),
            ("brand", "Preferred packaged bread brand", &config.brand, FrequencyOrder::ByCountDescending, ChartKind::Bar),
            ("package_size", "Preferred package size", &config.package_size, FrequencyOrder::ByCountDescending, ChartKind::Pie),
            ("packaged_reason", "Reason for buying packaged bread", &config.packaged_reason, FrequencyOrder::ByCountDescending, ChartKind::Bar),
            ("packaged_frequency", "Packaged bread consumption frequency", &config.packaged_frequency, FrequencyOrder::ByCountDescending, ChartKind::Bar),
        ];

        let analyses = specs
            .into_iter()
            .map(|(key, title, column, order, chart)| {
                Ok(ColumnAnalysis {
                    key,
                    title,
                    chart,
                    frequency: frequency_table(&consumers, column, order)?,
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        let crosstabs = vec![
            CrossTabAnalysis {
                key: "frequency_vs_importance",
                title: "Consumption frequency vs importance",
                table: cross_tabulate(&consumers, &config.frequency, &config.importance)?,
            },
            CrossTabAnalysis {
                key: "importance_vs_frequency",
                title: "Importance vs consumption frequency",
                table: cross_tabulate(&consumers, &config.importance, &config.frequency)?,
            },
        ];

        let key_questions: [(&'static str, &str); 6] = [
            ("Main consumption frequency", &config.frequency),
            ("Most preferred bread type", &config.bread_type),
            ("Main purchase location", &config.purchase_location),
            ("Top factor for packaged bread", &config.packaged_decision),
            ("Most preferred brand", &config.brand),
            ("Most popular package size", &config.package_size),
        ];
        let highlights = key_questions
            .into_iter()
            .map(|(label, column)| {
                Ok(Highlight {
                    label,
                    value: most_frequent(&consumers, column)?.map(|v| v.to_string()),
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        let period = config
            .timestamp
            .as_deref()
            .map(|column| collection_period(&consumers, column));

        Ok(Self {
            total_respondents: table.height(),
            consumers: consumers.height(),
            column_count: table.width(),
            profiles,
            analyses,
            crosstabs,
            mean_importance: StatsCalculator::mean_of(&consumers, &config.importance)?,
            highlights,
            period,
        })
    }

    /// Share of respondents who consume bread, in percent.
    pub fn consumer_share(&self) -> f64 {
        if self.total_respondents == 0 {
            0.0
        } else {
            self.consumers as f64 * 100.0 / self.total_respondents as f64
        }
    }

    pub fn analysis(&self, key: &str) -> Option<&ColumnAnalysis> {
        self.analyses.iter().find(|a| a.key == key)
    }

    pub fn crosstab(&self, key: &str) -> Option<&CrossTabAnalysis> {
        self.crosstabs.iter().find(|c| c.key == key)
    }
}

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(f, "\n{}\n{}\n{}", rule, title, rule)
}

fn write_frequency(f: &mut fmt::Formatter<'_>, freq: &FrequencyTable) -> fmt::Result {
    let width = freq
        .labels()
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(5);
    for (value, count) in freq.iter() {
        writeln!(
            f,
            "  {:<width$}  {:>5}  {:>5.1}%",
            value.to_string(),
            count,
            freq.share(value),
            width = width
        )?;
    }
    writeln!(f, "  {:<width$}  {:>5}", "Total", freq.total(), width = width)
}

fn write_crosstab(f: &mut fmt::Formatter<'_>, ct: &CrossTab) -> fmt::Result {
    let row_width = ct
        .row_labels()
        .iter()
        .map(|l| l.to_string().chars().count())
        .max()
        .unwrap_or(0)
        .max(5);
    let col_labels: Vec<String> = ct.col_labels().iter().map(|l| l.to_string()).collect();
    let widths: Vec<usize> = col_labels.iter().map(|l| l.chars().count().max(3)).collect();

    write!(f, "  {:<row_width$}", "", row_width = row_width)?;
    for (label, w) in col_labels.iter().zip(&widths) {
        write!(f, "  {:>w$}", label, w = *w)?;
    }
    writeln!(f)?;

    for (label, row) in ct.row_labels().iter().zip(ct.dense()) {
        write!(f, "  {:<row_width$}", label.to_string(), row_width = row_width)?;
        for (count, w) in row.iter().zip(&widths) {
            write!(f, "  {:>w$}", count, w = *w)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for SurveyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "SURVEY OVERVIEW")?;
        writeln!(f, "Respondents: {}", self.total_respondents)?;
        writeln!(f, "Columns: {}", self.column_count)?;
        writeln!(
            f,
            "Bread consumers: {} ({:.1}%)",
            self.consumers,
            self.consumer_share()
        )?;

        banner(f, "COLUMN PROFILES")?;
        for (i, p) in self.profiles.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, p.name)?;
            write!(
                f,
                "   present {}, missing {}, distinct {}",
                p.count, p.missing, p.unique
            )?;
            match &p.top {
                Some(top) => writeln!(f, ", top '{}' ({})", top, p.top_freq)?,
                None => writeln!(f)?,
            }
            if let Some(n) = &p.numeric {
                writeln!(
                    f,
                    "   mean {:.2}, std {:.2}, min {}, 25% {:.2}, median {:.2}, 75% {:.2}, max {}",
                    n.mean, n.std, n.min, n.p25, n.median, n.p75, n.max
                )?;
            }
        }

        banner(f, "KEY VARIABLES (BREAD CONSUMERS)")?;
        for (i, a) in self.analyses.iter().enumerate() {
            writeln!(f, "\n{}. {}:", i + 1, a.title)?;
            write_frequency(f, &a.frequency)?;
        }

        banner(f, "RELATIONSHIPS BETWEEN VARIABLES")?;
        for c in &self.crosstabs {
            writeln!(f, "\n{}:", c.title)?;
            write_crosstab(f, &c.table)?;
        }

        banner(f, "EXECUTIVE SUMMARY")?;
        writeln!(f, "• Valid responses (bread consumers): {}", self.consumers)?;
        match self.mean_importance {
            Some(mean) => writeln!(f, "• Average importance of bread: {:.2}/5", mean)?,
            None => writeln!(f, "• Average importance of bread: n/a")?,
        }
        for h in &self.highlights {
            writeln!(f, "• {}: {}", h.label, h.value.as_deref().unwrap_or("n/a"))?;
        }
        match &self.period {
            Some(CollectionPeriod::Available { first, last }) => writeln!(
                f,
                "\n• Collection period: {} to {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            )?,
            Some(CollectionPeriod::Unavailable(reason)) => {
                writeln!(f, "\n• Collection period unavailable: {}", reason)?
            }
            None => {}
        }
        Ok(())
    }
}

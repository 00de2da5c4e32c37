//! Survey Insights - console report & chart export for a survey CSV.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use survey_insights::charts::StaticChartRenderer;
use survey_insights::data::DataLoader;
use survey_insights::{SurveyConfig, SurveyReport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "survey_insights")]
#[command(about = "Exploratory analysis of the bread-consumption survey", long_about = None)]
struct Cli {
    /// Survey export (CSV with a header row)
    #[arg(value_name = "INPUT", default_value = "IMPAN.csv")]
    input: PathBuf,

    /// JSON file overriding column labels or the affirmative answer
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the PNG charts are written to
    #[arg(long, default_value = "charts")]
    charts_dir: PathBuf,

    /// Print the report only
    #[arg(long, default_value_t = false)]
    no_charts: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SurveyConfig::from_json_file(path)?,
        None => SurveyConfig::default(),
    };

    let table = DataLoader::load_csv(&cli.input)
        .with_context(|| format!("Cannot load survey {}", cli.input.display()))?;
    let report = SurveyReport::build(&table, &config)
        .with_context(|| format!("Cannot analyse survey {}", cli.input.display()))?;

    print!("{}", report);

    if cli.no_charts {
        info!("Chart export skipped");
    } else if let Err(e) = StaticChartRenderer::render_all(&report, &cli.charts_dir) {
        warn!(error = %e, "Chart export failed");
    }

    Ok(())
}

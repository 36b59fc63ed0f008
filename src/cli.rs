use std::path::PathBuf;

use clap::Parser;

use crate::config::AnalysisConfig;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Clean a streaming catalog CSV and chart what it contains"
)]
pub struct Cli {
    /// Catalog CSV file to analyze
    pub input: PathBuf,
    /// Directory for the rendered PNG charts
    #[arg(short = 'o', long = "output-dir", default_value = "charts")]
    pub output_dir: PathBuf,
    /// Entries kept by each top-N ranking
    #[arg(long, default_value_t = 10)]
    pub top: usize,
    /// Chart width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,
    /// Chart height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,
    /// Skip chart rendering and only print the analysis
    #[arg(long = "no-charts")]
    pub no_charts: bool,
    /// Write the full report as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,
}

impl Cli {
    pub fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            top_n: self.top,
            output_dir: self.output_dir.clone(),
            chart_width: self.width,
            chart_height: self.height,
            render_charts: !self.no_charts,
            ..AnalysisConfig::default()
        }
    }
}

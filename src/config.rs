//! Run configuration

use std::path::PathBuf;

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Entries kept by the top-N rankings (genres, countries, directors, cast).
    pub top_n: usize,
    /// Entries kept by the country summary of the category counts.
    pub summary_top: usize,
    /// Directory receiving rendered charts.
    pub output_dir: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    pub render_charts: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            summary_top: 5,
            output_dir: PathBuf::from("charts"),
            chart_width: 1000,
            chart_height: 600,
            render_charts: true,
        }
    }
}

//! Analysis module - load, clean, analyze and render a catalog

mod analyzer;
pub mod report;

pub use analyzer::{AnalysisError, CatalogAnalyzer, CORRELATION_COLUMNS};
pub use report::CatalogReport;

use crate::charts::{ChartRenderer, ChartSpec};
use crate::config::AnalysisConfig;
use crate::data::{CatalogLoader, CatalogTable, DataCleaner};
use anyhow::{Context, Result};
use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

fn log_null_counts(stage: &str, table: &CatalogTable) {
    let missing: Vec<String> = table
        .null_counts()
        .into_iter()
        .filter(|(_, nulls)| *nulls > 0)
        .map(|(name, nulls)| format!("{name}={nulls}"))
        .collect();
    if missing.is_empty() {
        info!("No missing values {stage}");
    } else {
        info!("Missing values {stage}: {}", missing.join(", "));
    }
}

/// Render every chart in parallel. Failures become warnings, never errors.
pub fn render_all(renderer: &dyn ChartRenderer, charts: &[ChartSpec]) -> (Vec<PathBuf>, Vec<String>) {
    let outcomes: Vec<_> = charts.par_iter().map(|chart| renderer.render(chart)).collect();

    let mut rendered = Vec::new();
    let mut warnings = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(path) => rendered.push(path),
            Err(e) => {
                warn!("{e}");
                warnings.push(e.to_string());
            }
        }
    }
    (rendered, warnings)
}

/// Load, clean and analyze the catalog at `path`, rendering charts when a
/// renderer is given.
pub fn run_pipeline(
    path: &Path,
    config: &AnalysisConfig,
    renderer: Option<&dyn ChartRenderer>,
) -> Result<CatalogReport> {
    let table = CatalogLoader::new()
        .load(path)
        .with_context(|| format!("Loading catalog from {path:?}"))?;
    log_null_counts("before cleaning", &table);

    let mut table = DataCleaner::clean(table).context("Cleaning catalog")?;
    log_null_counts("after cleaning", &table);

    let analyzer = CatalogAnalyzer::new(config);
    let mut report = analyzer
        .analyze(&mut table)
        .context("Analyzing catalog")?;

    if let Some(renderer) = renderer {
        let charts = analyzer.chart_specs(&report);
        let (rendered, warnings) = render_all(renderer, &charts);
        info!("Rendered {} of {} charts", rendered.len(), charts.len());
        report.rendered = rendered;
        report.warnings = warnings;
    }

    Ok(report)
}

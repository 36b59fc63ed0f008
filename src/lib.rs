//! Catalog EDA - streaming catalog cleaning, analysis & chart generation
//!
//! Loads a catalog CSV with Polars, repairs missing values, derives
//! calendar columns and answers a fixed set of analytical questions,
//! rendering each answer as a PNG chart.

pub mod analysis;
pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod stats;

use std::{env, fs, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use crate::analysis::run_pipeline;
use crate::charts::{ChartRenderer, PlottersRenderer};
use crate::cli::Cli;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("catalog_eda", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = cli.to_config();

    let report = if config.render_charts {
        let renderer =
            PlottersRenderer::new(&config.output_dir, config.chart_width, config.chart_height);
        info!("Writing charts to {:?}", renderer.output_dir());
        run_pipeline(&cli.input, &config, Some(&renderer as &dyn ChartRenderer))?
    } else {
        run_pipeline(&cli.input, &config, None)?
    };

    for line in report.summary_lines() {
        println!("{line}");
    }

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&report).context("Serializing report")?;
        fs::write(path, json).with_context(|| format!("Writing report to {path:?}"))?;
        info!("Report written to {:?}", path);
    }
    Ok(())
}

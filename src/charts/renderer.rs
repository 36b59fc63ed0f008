//! Static Chart Renderer
//! Draws chart specs to PNG files with plotters.
//!
//! Supported layouts:
//! - vertical bars (categorical counts, one color per bar from the palette)
//! - horizontal bars (largest value on top)
//! - line with circle markers
//! - stacked vertical bars with a legend
//! - annotated correlation heatmap on a cool-warm scale

use crate::charts::spec::{ChartData, ChartKind, ChartSpec, Rgb};
use log::debug;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontTransform, TextStyle};
use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Longest axis label drawn before truncation.
const MAX_LABEL_CHARS: usize = 28;

// Cool-warm scale end points (RGB)
const COOL: Rgb = [59, 76, 192];
const NEUTRAL: Rgb = [221, 221, 221];
const WARM: Rgb = [180, 4, 38];
const MISSING: RGBColor = RGBColor(200, 200, 200);

type DrawResult = Result<(), Box<dyn StdError>>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart '{0}' has no data to draw")]
    EmptyChart(String),
    #[error("Chart '{name}' data cannot be drawn as {kind:?}")]
    KindMismatch { name: String, kind: ChartKind },
    #[error("Failed to prepare chart output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to draw chart '{name}': {message}")]
    Draw { name: String, message: String },
}

/// Consumes finished chart specs and produces an image per chart.
pub trait ChartRenderer: Sync {
    /// Render one chart, returning where the artifact was written.
    fn render(&self, chart: &ChartSpec) -> Result<PathBuf, RenderError>;
}

/// Writes `<output_dir>/<chart name>.png` using the plotters bitmap backend.
pub struct PlottersRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl PlottersRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            output_dir: output_dir.into(),
            width,
            height,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn rgb(color: Rgb) -> RGBColor {
        RGBColor(color[0], color[1], color[2])
    }

    /// Headroom above the tallest bar.
    fn axis_max(values: impl IntoIterator<Item = usize>) -> u32 {
        let max = values.into_iter().max().unwrap_or(0) as f64;
        (max * 1.1).ceil() as u32 + 1
    }

    fn segment_index(value: &SegmentValue<u32>) -> Option<usize> {
        match value {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => Some(*i as usize),
            SegmentValue::Last => None,
        }
    }

    fn segment_label(labels: &[String], value: &SegmentValue<u32>) -> String {
        Self::segment_index(value)
            .and_then(|i| labels.get(i))
            .map(|label| Self::short_label(label))
            .unwrap_or_default()
    }

    fn short_label(label: &str) -> String {
        if label.chars().count() <= MAX_LABEL_CHARS {
            label.to_string()
        } else {
            let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
            format!("{head}…")
        }
    }

    /// Map a coefficient in [-1, 1] onto the cool-warm scale.
    fn coolwarm(value: f64) -> RGBColor {
        if value.is_nan() {
            return MISSING;
        }
        let t = ((value + 1.0) / 2.0).clamp(0.0, 1.0);
        let (from, to, local) = if t < 0.5 {
            (COOL, NEUTRAL, t * 2.0)
        } else {
            (NEUTRAL, WARM, (t - 0.5) * 2.0)
        };
        let channel = |i: usize| (from[i] as f64 + (to[i] as f64 - from[i] as f64) * local) as u8;
        RGBColor(channel(0), channel(1), channel(2))
    }

    fn draw_bars(&self, path: &Path, chart: &ChartSpec, labels: &[String], values: &[usize]) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = labels.len() as u32;
        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(110)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u32..Self::axis_max(values.iter().copied()))?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(labels.len())
            .x_label_formatter(&|v| Self::segment_label(labels, v))
            .x_label_style(("sans-serif", 12).into_font().transform(FontTransform::Rotate90))
            .draw()?;

        ctx.draw_series(
            Histogram::vertical(&ctx)
                .margin(8)
                .style_func(|v, _| {
                    let idx = Self::segment_index(v).unwrap_or(0);
                    Self::rgb(chart.color_at(idx)).filled()
                })
                .data(values.iter().enumerate().map(|(i, &count)| (i as u32, count as u32))),
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_horizontal_bars(
        &self,
        path: &Path,
        chart: &ChartSpec,
        labels: &[String],
        values: &[usize],
    ) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        // Largest first in the data, so it goes in the top slot.
        let n = labels.len() as u32;
        let flipped: Vec<String> = labels.iter().rev().cloned().collect();

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(220)
            .build_cartesian_2d(0u32..Self::axis_max(values.iter().copied()), (0u32..n).into_segmented())?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .y_labels(labels.len())
            .y_label_formatter(&|v| Self::segment_label(&flipped, v))
            .draw()?;

        ctx.draw_series(
            Histogram::horizontal(&ctx)
                .margin(6)
                .style(Self::rgb(chart.color_at(0)).filled())
                .data(
                    values
                        .iter()
                        .enumerate()
                        .map(|(i, &count)| (n - 1 - i as u32, count as u32)),
                ),
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_line(&self, path: &Path, chart: &ChartSpec, labels: &[String], values: &[usize]) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = labels.len() as u32;
        let color = Self::rgb(chart.color_at(0));
        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u32..Self::axis_max(values.iter().copied()))?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(labels.len())
            .x_label_formatter(&|v| Self::segment_label(labels, v))
            .draw()?;

        let points: Vec<(SegmentValue<u32>, u32)> = values
            .iter()
            .enumerate()
            .map(|(i, &count)| (SegmentValue::CenterOf(i as u32), count as u32))
            .collect();

        ctx.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?;
        ctx.draw_series(
            points
                .into_iter()
                .map(|point| Circle::new(point, 5, color.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_stacked(
        &self,
        path: &Path,
        chart: &ChartSpec,
        categories: &[String],
        series: &[(String, Vec<usize>)],
    ) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = categories.len();
        let totals: Vec<usize> = (0..n)
            .map(|i| series.iter().map(|(_, counts)| counts.get(i).copied().unwrap_or(0)).sum())
            .collect();

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n as u32).into_segmented(), 0u32..Self::axis_max(totals))?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(n)
            .x_label_formatter(&|v| Self::segment_label(categories, v))
            .x_label_style(("sans-serif", 11).into_font().transform(FontTransform::Rotate90))
            .draw()?;

        let mut baseline = vec![0u32; n];
        for (layer, (name, counts)) in series.iter().enumerate() {
            let bottoms = baseline.clone();
            let tops: Vec<u32> = bottoms
                .iter()
                .enumerate()
                .map(|(i, bottom)| bottom + counts.get(i).copied().unwrap_or(0) as u32)
                .collect();
            let color = Self::rgb(chart.color_at(layer));

            ctx.draw_series(
                Histogram::vertical(&ctx)
                    .margin(2)
                    .style(color.filled())
                    .baseline_func(move |v| {
                        Self::segment_index(v)
                            .and_then(|i| bottoms.get(i).copied())
                            .unwrap_or(0)
                    })
                    .data(
                        tops.iter()
                            .enumerate()
                            .filter(|(i, top)| **top > baseline[*i])
                            .map(|(i, &top)| (i as u32, top)),
                    ),
            )?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));

            baseline = tops;
        }

        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    fn draw_heatmap(&self, path: &Path, chart: &ChartSpec, labels: &[String], values: &[Vec<f64>]) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = labels.len() as u32;
        // Row 0 is drawn at the top.
        let flipped: Vec<String> = labels.iter().rev().cloned().collect();

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(120)
            .build_cartesian_2d((0u32..n).into_segmented(), (0u32..n).into_segmented())?;

        ctx.configure_mesh()
            .disable_mesh()
            .x_labels(labels.len())
            .y_labels(labels.len())
            .x_label_formatter(&|v| Self::segment_label(labels, v))
            .y_label_formatter(&|v| Self::segment_label(&flipped, v))
            .draw()?;

        let cells: Vec<(u32, u32, f64)> = values
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(j, &value)| (j as u32, n - 1 - i as u32, value))
            })
            .collect();

        ctx.draw_series(cells.iter().map(|&(x, y, value)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                Self::coolwarm(value).filled(),
            )
        }))?;

        let annotation = TextStyle::from(("sans-serif", 18).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        ctx.draw_series(cells.iter().map(|&(x, y, value)| {
            let text = if value.is_nan() {
                "nan".to_string()
            } else {
                format!("{value:.2}")
            };
            Text::new(
                text,
                (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                annotation.clone(),
            )
        }))?;

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<PathBuf, RenderError> {
        if chart.is_empty() {
            return Err(RenderError::EmptyChart(chart.name.clone()));
        }

        let path = self.output_dir.join(format!("{}.png", chart.name));
        let drawn = match (chart.kind, &chart.data) {
            (ChartKind::Bar, ChartData::Series { labels, values }) => {
                fs::create_dir_all(&self.output_dir)?;
                self.draw_bars(&path, chart, labels, values)
            }
            (ChartKind::HorizontalBar, ChartData::Series { labels, values }) => {
                fs::create_dir_all(&self.output_dir)?;
                self.draw_horizontal_bars(&path, chart, labels, values)
            }
            (ChartKind::Line, ChartData::Series { labels, values }) => {
                fs::create_dir_all(&self.output_dir)?;
                self.draw_line(&path, chart, labels, values)
            }
            (ChartKind::StackedBar, ChartData::Stacked { categories, series }) => {
                fs::create_dir_all(&self.output_dir)?;
                self.draw_stacked(&path, chart, categories, series)
            }
            (ChartKind::Heatmap, ChartData::Matrix { labels, values }) => {
                fs::create_dir_all(&self.output_dir)?;
                self.draw_heatmap(&path, chart, labels, values)
            }
            (kind, _) => {
                return Err(RenderError::KindMismatch {
                    name: chart.name.clone(),
                    kind,
                })
            }
        };

        drawn.map_err(|e| RenderError::Draw {
            name: chart.name.clone(),
            message: e.to_string(),
        })?;
        debug!("Rendered chart '{}' to {}", chart.name, path.display());
        Ok(path)
    }
}

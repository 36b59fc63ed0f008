//! Chart Specification Module
//! Renderer-independent description of one finished chart.

use crate::stats::{CorrelationMatrix, PivotTable};

/// RGB triple.
pub type Rgb = [u8; 3];

pub const SKY_BLUE: Rgb = [135, 206, 235];
pub const LIGHT_GREEN: Rgb = [144, 238, 144];
pub const ORANGE: Rgb = [255, 165, 0];
pub const LIGHT_CORAL: Rgb = [240, 128, 128];
pub const PLUM: Rgb = [221, 160, 221];
pub const GOLD: Rgb = [255, 215, 0];
pub const LIGHT_YELLOW: Rgb = [255, 255, 224];
pub const LIGHT_PINK: Rgb = [255, 182, 193];
pub const BEIGE: Rgb = [245, 245, 220];
pub const LAVENDER: Rgb = [230, 230, 250];
pub const LIGHT_BLUE: Rgb = [173, 216, 230];
pub const SALMON: Rgb = [250, 128, 114];
pub const CORAL: Rgb = [255, 127, 80];

/// One color per bar for the genre chart.
pub const GENRE_PALETTE: [Rgb; 10] = [
    SKY_BLUE,
    LIGHT_GREEN,
    ORANGE,
    LIGHT_CORAL,
    PLUM,
    GOLD,
    LIGHT_YELLOW,
    LIGHT_PINK,
    BEIGE,
    LAVENDER,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Line,
    StackedBar,
    Heatmap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// Categorical counts, one value per label.
    Series {
        labels: Vec<String>,
        values: Vec<usize>,
    },
    /// One count series per stack layer, aligned with `categories`.
    Stacked {
        categories: Vec<String>,
        series: Vec<(String, Vec<usize>)>,
    },
    /// Square numeric matrix with one label per row/column.
    Matrix {
        labels: Vec<String>,
        values: Vec<Vec<f64>>,
    },
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// File stem of the rendered image.
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub data: ChartData,
    /// Cycled when there are more bars or layers than colors.
    pub colors: Vec<Rgb>,
}

impl ChartSpec {
    /// Bar, horizontal bar or line chart over labelled counts.
    pub fn series<L: ToString>(
        kind: ChartKind,
        name: &str,
        title: &str,
        axes: (&str, &str),
        points: &[(L, usize)],
    ) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            x_label: axes.0.to_string(),
            y_label: axes.1.to_string(),
            kind,
            data: ChartData::Series {
                labels: points.iter().map(|(label, _)| label.to_string()).collect(),
                values: points.iter().map(|(_, count)| *count).collect(),
            },
            colors: vec![SKY_BLUE],
        }
    }

    /// Stacked bars: one bar per pivot row, one layer per pivot column.
    pub fn stacked<R: ToString, C: ToString>(
        name: &str,
        title: &str,
        axes: (&str, &str),
        pivot: &PivotTable<R, C>,
    ) -> Self {
        let series = pivot
            .columns
            .iter()
            .enumerate()
            .map(|(j, column)| (column.to_string(), pivot.column_counts(j)))
            .collect();

        Self {
            name: name.to_string(),
            title: title.to_string(),
            x_label: axes.0.to_string(),
            y_label: axes.1.to_string(),
            kind: ChartKind::StackedBar,
            data: ChartData::Stacked {
                categories: pivot.rows.iter().map(|r| r.to_string()).collect(),
                series,
            },
            colors: vec![SKY_BLUE, ORANGE],
        }
    }

    /// Annotated heatmap of a correlation matrix.
    pub fn heatmap(name: &str, title: &str, matrix: &CorrelationMatrix) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            x_label: String::new(),
            y_label: String::new(),
            kind: ChartKind::Heatmap,
            data: ChartData::Matrix {
                labels: matrix.labels.clone(),
                values: matrix.values.clone(),
            },
            colors: Vec::new(),
        }
    }

    pub fn with_colors(mut self, colors: &[Rgb]) -> Self {
        self.colors = colors.to_vec();
        self
    }

    /// Color for the `index`-th bar or layer.
    pub fn color_at(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            SKY_BLUE
        } else {
            self.colors[index % self.colors.len()]
        }
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            ChartData::Series { labels, .. } => labels.is_empty(),
            ChartData::Stacked { categories, series } => {
                categories.is_empty() || series.is_empty()
            }
            ChartData::Matrix { labels, .. } => labels.is_empty(),
        }
    }
}

//! Analysis Report Module
//! Structured results of every catalog analysis plus the printed summary.

use crate::stats::{CorrelationMatrix, DescriptiveStats, PivotTable};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

impl ValueCount {
    pub fn from_pairs<K: ToString>(pairs: Vec<(K, usize)>) -> Vec<Self> {
        pairs
            .into_iter()
            .map(|(value, count)| Self {
                value: value.to_string(),
                count,
            })
            .collect()
    }

    pub fn as_pair(&self) -> (&str, usize) {
        (self.value.as_str(), self.count)
    }
}

/// Frequency overview of the categorical columns and `release_year`.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCounts {
    pub type_counts: Vec<ValueCount>,
    pub rating_counts: Vec<ValueCount>,
    pub release_year: DescriptiveStats,
    pub top_countries: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryTotal {
    pub country: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentByCountry {
    pub most: CountryTotal,
    pub top: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorTotal {
    pub director: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleCast {
    pub title: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CastExtremes {
    pub max: TitleCast,
    pub top: Vec<TitleCast>,
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    /// Rows left after cleaning.
    pub rows: usize,
    pub category_counts: CategoryCounts,
    pub correlation: CorrelationMatrix,
    pub top_genres: Vec<ValueCount>,
    pub type_distribution: Vec<ValueCount>,
    pub titles_per_year: Vec<YearCount>,
    pub content_by_country: ContentByCountry,
    pub top_directors: Vec<DirectorTotal>,
    pub titles_by_release_year: PivotTable<i64, String>,
    pub cast_extremes: CastExtremes,
    /// Charts written by the renderer, in chart order.
    pub rendered: Vec<PathBuf>,
    /// Render failures; the analyses above are unaffected by them.
    pub warnings: Vec<String>,
}

impl CatalogReport {
    /// Human-readable answers for country, directors and cast size.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let most = &self.content_by_country.most;
        lines.push(format!(
            "The country with the most content is: {} with {} titles.",
            most.country, most.count
        ));

        lines.push(format!(
            "Top {} Directors with the Highest Number of Titles:",
            self.top_directors.len()
        ));
        for director in &self.top_directors {
            lines.push(format!("  {:<40} {}", director.director, director.count));
        }

        let max = &self.cast_extremes.max;
        lines.push(format!("The title with the most actors is: {}", max.title));
        lines.push(format!("Number of actors: {}", max.count));

        lines
    }
}

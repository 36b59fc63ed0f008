//! Catalog Analyzer Module
//! The analytical questions asked of the cleaned catalog, and the charts
//! answering them.

use crate::analysis::report::{
    CastExtremes, CatalogReport, CategoryCounts, ContentByCountry, CountryTotal, DirectorTotal,
    TitleCast, ValueCount, YearCount,
};
use crate::charts::spec::{ChartKind, ChartSpec, CORAL, GENRE_PALETTE, LIGHT_BLUE, LIGHT_GREEN, SALMON, SKY_BLUE};
use crate::config::AnalysisConfig;
use crate::data::table::{
    CatalogTable, TableError, CAST, CAST_COUNT, COUNTRY, DIRECTOR, LISTED_IN, MONTH_ADDED,
    RATING, RELEASE_YEAR, SHOW_TYPE, TITLE, YEAR_ADDED,
};
use crate::stats::aggregate::{
    count_by_key, count_list_entries, count_sorted_by_key, first_max_by_key, pivot_counts,
    rank_by_key, split_list, top_n,
};
use crate::stats::{CorrelationMatrix, PivotTable, StatsCalculator};
use log::{debug, info};
use thiserror::Error;

/// Columns compared by the correlation heatmap.
pub const CORRELATION_COLUMNS: [&str; 3] = [RELEASE_YEAR, MONTH_ADDED, YEAR_ADDED];

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Cannot determine {0}: the cleaned table has no rows")]
    EmptyResult(&'static str),
    #[error("Column '{column}' has no value in row {row}")]
    MissingValue { column: &'static str, row: usize },
}

fn value_counts(values: Vec<Option<&str>>) -> Vec<ValueCount> {
    ValueCount::from_pairs(count_by_key(values.into_iter().flatten()))
}

fn pairs(counts: &[ValueCount]) -> Vec<(&str, usize)> {
    counts.iter().map(ValueCount::as_pair).collect()
}

/// Runs every analysis over a cleaned catalog table.
pub struct CatalogAnalyzer {
    top_n: usize,
    summary_top: usize,
}

impl CatalogAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            top_n: config.top_n,
            summary_top: config.summary_top,
        }
    }

    /// Run all analyses in their fixed order.
    ///
    /// Writes the derived `cast_count` column into `table`.
    pub fn analyze(&self, table: &mut CatalogTable) -> Result<CatalogReport, AnalysisError> {
        let category_counts = self.category_counts(table)?;
        let correlation = self.correlation(table)?;
        let top_genres = self.top_genres(table)?;
        let type_distribution = self.type_distribution(table)?;
        let titles_per_year = self.titles_per_year(table)?;
        let content_by_country = self.content_by_country(table)?;
        let top_directors = self.top_directors(table)?;
        let titles_by_release_year = self.titles_by_release_year(table)?;
        let cast_extremes = self.cast_extremes(table)?;

        info!(
            "Most content: {} ({} titles); most cast members: {} ({})",
            content_by_country.most.country,
            content_by_country.most.count,
            cast_extremes.max.title,
            cast_extremes.max.count
        );

        Ok(CatalogReport {
            rows: table.height(),
            category_counts,
            correlation,
            top_genres,
            type_distribution,
            titles_per_year,
            content_by_country,
            top_directors,
            titles_by_release_year,
            cast_extremes,
            rendered: Vec::new(),
            warnings: Vec::new(),
        })
    }

    /// Type and rating frequencies, release year summary, most common countries.
    pub fn category_counts(&self, table: &CatalogTable) -> Result<CategoryCounts, AnalysisError> {
        let type_counts = value_counts(table.text_values(SHOW_TYPE)?);
        let rating_counts = value_counts(table.text_values(RATING)?);

        let years: Vec<f64> = table
            .int_values(RELEASE_YEAR)?
            .into_iter()
            .flatten()
            .map(|year| year as f64)
            .collect();
        let release_year = StatsCalculator::compute_descriptive_stats(&years);

        let mut top_countries = value_counts(table.text_values(COUNTRY)?);
        top_countries.truncate(self.summary_top);

        debug!(
            "Category counts: {} types, {} ratings, release years {:.0}..{:.0}",
            type_counts.len(),
            rating_counts.len(),
            release_year.min,
            release_year.max
        );

        Ok(CategoryCounts {
            type_counts,
            rating_counts,
            release_year,
            top_countries,
        })
    }

    /// Pearson correlation of release year against the date-added parts.
    pub fn correlation(&self, table: &CatalogTable) -> Result<CorrelationMatrix, AnalysisError> {
        let columns = CORRELATION_COLUMNS
            .iter()
            .map(|name| -> Result<(String, Vec<Option<f64>>), TableError> {
                Ok((name.to_string(), table.float_values(name)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StatsCalculator::correlation_matrix(&columns))
    }

    /// Most frequent genres across the comma-joined `listed_in` lists.
    ///
    /// Tokens are trimmed and empty ones skipped, so `"Drama, Comedy"` and
    /// `"Drama,Comedy"` yield the same genres. The raw split would count
    /// `" Comedy"` separately.
    pub fn top_genres(&self, table: &CatalogTable) -> Result<Vec<ValueCount>, AnalysisError> {
        let listed = table.text_values(LISTED_IN)?;
        let genres = count_by_key(listed.into_iter().flatten().flat_map(split_list));
        Ok(ValueCount::from_pairs(top_n(&genres, self.top_n)))
    }

    /// Rows per content type.
    pub fn type_distribution(&self, table: &CatalogTable) -> Result<Vec<ValueCount>, AnalysisError> {
        Ok(value_counts(table.text_values(SHOW_TYPE)?))
    }

    /// Titles added per year, oldest first.
    pub fn titles_per_year(&self, table: &CatalogTable) -> Result<Vec<YearCount>, AnalysisError> {
        let years = table.int_values(YEAR_ADDED)?;
        Ok(count_sorted_by_key(years.into_iter().flatten())
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect())
    }

    /// The country with the most titles plus the leading countries.
    pub fn content_by_country(&self, table: &CatalogTable) -> Result<ContentByCountry, AnalysisError> {
        let ranked = value_counts(table.text_values(COUNTRY)?);
        let most = ranked
            .first()
            .map(|top| CountryTotal {
                country: top.value.clone(),
                count: top.count,
            })
            .ok_or(AnalysisError::EmptyResult("the country with the most content"))?;

        Ok(ContentByCountry {
            most,
            top: ranked.into_iter().take(self.top_n).collect(),
        })
    }

    /// Directors with the most titles; `"unknown"` counts like any name.
    pub fn top_directors(&self, table: &CatalogTable) -> Result<Vec<DirectorTotal>, AnalysisError> {
        let directors = count_by_key(table.text_values(DIRECTOR)?.into_iter().flatten());
        Ok(top_n(&directors, self.top_n)
            .into_iter()
            .map(|(director, count)| DirectorTotal {
                director: director.to_string(),
                count,
            })
            .collect())
    }

    /// Titles per release year split by content type.
    pub fn titles_by_release_year(
        &self,
        table: &CatalogTable,
    ) -> Result<PivotTable<i64, String>, AnalysisError> {
        let years = table.int_values(RELEASE_YEAR)?;
        let types = table.text_values(SHOW_TYPE)?;
        Ok(pivot_counts(
            years
                .into_iter()
                .zip(types)
                .filter_map(|(year, kind)| Some((year?, kind?.to_string()))),
        ))
    }

    /// Derive `cast_count` and find the titles with the largest casts.
    pub fn cast_extremes(&self, table: &mut CatalogTable) -> Result<CastExtremes, AnalysisError> {
        let counts: Vec<i64> = table
            .text_values(CAST)?
            .into_iter()
            .map(|cast| cast.map_or(1, count_list_entries) as i64)
            .collect();
        table.set_int_column(CAST_COUNT, counts)?;

        let titles = table.text_values(TITLE)?;
        let counts = table.int_values(CAST_COUNT)?;
        let rows = titles
            .into_iter()
            .zip(counts)
            .enumerate()
            .map(|(row, (title, count))| {
                let title = title.ok_or(AnalysisError::MissingValue { column: TITLE, row })?;
                let count = count.ok_or(AnalysisError::MissingValue {
                    column: CAST_COUNT,
                    row,
                })?;
                Ok(TitleCast {
                    title: title.to_string(),
                    count: count as usize,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        let max = first_max_by_key(&rows, |row| row.count)
            .cloned()
            .ok_or(AnalysisError::EmptyResult("the title with the most cast members"))?;
        let top = rank_by_key(&rows, self.top_n, |row| row.count);

        Ok(CastExtremes { max, top })
    }

    /// Chart specs for every charted analysis, in report order.
    pub fn chart_specs(&self, report: &CatalogReport) -> Vec<ChartSpec> {
        let n = self.top_n;
        let directors: Vec<(&str, usize)> = report
            .top_directors
            .iter()
            .map(|d| (d.director.as_str(), d.count))
            .collect();
        let years: Vec<(i64, usize)> = report
            .titles_per_year
            .iter()
            .map(|y| (y.year, y.count))
            .collect();
        let cast: Vec<(&str, usize)> = report
            .cast_extremes
            .top
            .iter()
            .map(|t| (t.title.as_str(), t.count))
            .collect();

        vec![
            ChartSpec::heatmap("correlation_heatmap", "Correlation Heatmap", &report.correlation),
            ChartSpec::series(
                ChartKind::Bar,
                "top_genres",
                &format!("Top {n} Most Common Genres"),
                ("Genres", "Count"),
                &pairs(&report.top_genres),
            )
            .with_colors(&GENRE_PALETTE),
            ChartSpec::series(
                ChartKind::Bar,
                "type_distribution",
                "Distribution of Movies vs TV Shows",
                ("Type", "Count"),
                &pairs(&report.type_distribution),
            )
            .with_colors(&[SKY_BLUE, LIGHT_GREEN]),
            ChartSpec::series(
                ChartKind::Line,
                "titles_per_year",
                "Trend in Number of Titles Added Annually",
                ("Year", "Number of Titles Added"),
                &years,
            )
            .with_colors(&[CORAL]),
            ChartSpec::series(
                ChartKind::Bar,
                "top_countries",
                &format!("Top {n} Countries Contributing the Most Content"),
                ("Country", "Number of Titles"),
                &pairs(&report.content_by_country.top),
            )
            .with_colors(&[LIGHT_BLUE]),
            ChartSpec::series(
                ChartKind::Bar,
                "top_directors",
                &format!("Top {n} Directors with the Highest Number of Titles"),
                ("Director", "Number of Titles"),
                &directors,
            )
            .with_colors(&[SALMON]),
            ChartSpec::stacked(
                "titles_by_release_year",
                "Number of Movies and TV Shows per Release Year",
                ("Release Year", "Number of Titles Added"),
                &report.titles_by_release_year,
            ),
            ChartSpec::series(
                ChartKind::HorizontalBar,
                "top_cast",
                &format!("Top {n} Titles with the Most Actors"),
                ("Number of Actors", "Title"),
                &cast,
            )
            .with_colors(&[SKY_BLUE]),
        ]
    }
}

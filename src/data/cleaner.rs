//! Data Cleaner Module
//! Repairs missing values and derives calendar columns from `date_added`.

use crate::data::table::{
    days_since_epoch, CatalogTable, TableError, CAST, COUNTRY, DATE_ADDED, DESCRIPTION,
    DIRECTOR, MONTH_ADDED, RATING, YEAR_ADDED,
};
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use polars::prelude::*;
use thiserror::Error;

/// Fill value for missing `director` and `cast`.
pub const UNKNOWN: &str = "unknown";
/// Fill value for missing `country`.
pub const NOT_SPECIFIED: &str = "notspecified";

/// Accepted `date_added` layouts, tried in order after trimming whitespace.
/// `%B` also matches abbreviated month names.
pub const DATE_FORMATS: [&str; 3] = ["%B %d, %Y", "%Y-%m-%d", "%m/%d/%Y"];

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Cannot parse date_added value '{value}' in row {row}")]
    UnparseableDate { row: usize, value: String },
    #[error("date_added has unsupported type {0}")]
    UnsupportedDateType(DataType),
}

/// Parse one raw `date_added` value.
pub fn parse_date_added(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Runs the ordered cleaning steps over a catalog table.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean a freshly loaded table. Cleaning an already cleaned table is a no-op.
    pub fn clean(table: CatalogTable) -> Result<CatalogTable, CleanError> {
        let loaded_rows = table.height();

        let df = Self::drop_unused_columns(table.into_dataframe())?;
        let df = Self::fill_missing(df)?;
        let df = Self::drop_incomplete_rows(df)?;
        let df = Self::derive_date_parts(df)?;

        info!(
            "Cleaning kept {} of {} rows ({} dropped)",
            df.height(),
            loaded_rows,
            loaded_rows - df.height()
        );
        Ok(CatalogTable::new(df))
    }

    /// Drop `description`, which no analysis reads.
    pub fn drop_unused_columns(df: DataFrame) -> Result<DataFrame, CleanError> {
        if df
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == DESCRIPTION)
        {
            debug!("Dropping column '{}'", DESCRIPTION);
            Ok(df.drop(DESCRIPTION)?)
        } else {
            Ok(df)
        }
    }

    /// Replace missing director, cast and country with their sentinels.
    pub fn fill_missing(df: DataFrame) -> Result<DataFrame, CleanError> {
        let filled = df
            .lazy()
            .with_columns([
                col(DIRECTOR).fill_null(lit(UNKNOWN)),
                col(CAST).fill_null(lit(UNKNOWN)),
                col(COUNTRY).fill_null(lit(NOT_SPECIFIED)),
            ])
            .collect()?;
        Ok(filled)
    }

    /// Drop rows without a `date_added`, then rows without a `rating`.
    pub fn drop_incomplete_rows(df: DataFrame) -> Result<DataFrame, CleanError> {
        let before = df.height();
        let kept = df
            .lazy()
            .filter(col(DATE_ADDED).is_not_null())
            .filter(col(RATING).is_not_null())
            .collect()?;
        debug!(
            "Dropped {} rows missing {} or {}",
            before - kept.height(),
            DATE_ADDED,
            RATING
        );
        Ok(kept)
    }

    /// Replace `date_added` with a date column and add `month_added` / `year_added`.
    pub fn derive_date_parts(mut df: DataFrame) -> Result<DataFrame, CleanError> {
        let dates = Self::parse_dates(&df)?;

        let days: Vec<i32> = dates.iter().map(|d| days_since_epoch(*d)).collect();
        let months: Vec<i32> = dates.iter().map(|d| d.month() as i32).collect();
        let years: Vec<i32> = dates.iter().map(|d| d.year()).collect();

        let date_column = Column::new(DATE_ADDED.into(), days).cast(&DataType::Date)?;
        df.with_column(date_column)?;
        df.with_column(Column::new(MONTH_ADDED.into(), months))?;
        df.with_column(Column::new(YEAR_ADDED.into(), years))?;
        Ok(df)
    }

    fn parse_dates(df: &DataFrame) -> Result<Vec<NaiveDate>, CleanError> {
        let column = df.column(DATE_ADDED)?;
        match column.dtype() {
            DataType::String => column
                .str()?
                .into_iter()
                .enumerate()
                .map(|(row, raw)| {
                    raw.and_then(parse_date_added)
                        .ok_or_else(|| CleanError::UnparseableDate {
                            row,
                            value: raw.unwrap_or_default().to_string(),
                        })
                })
                .collect(),
            // Already parsed by an earlier pass.
            DataType::Date => CatalogTable::new(df.clone())
                .date_values(DATE_ADDED)?
                .into_iter()
                .enumerate()
                .map(|(row, date)| {
                    date.ok_or(CleanError::UnparseableDate {
                        row,
                        value: String::new(),
                    })
                })
                .collect(),
            other => Err(CleanError::UnsupportedDateType(other.clone())),
        }
    }
}

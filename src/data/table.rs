//! Catalog Table Module
//! Named, typed column access over the in-memory catalog DataFrame.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use thiserror::Error;

pub const SHOW_TYPE: &str = "type";
pub const TITLE: &str = "title";
pub const DIRECTOR: &str = "director";
pub const CAST: &str = "cast";
pub const COUNTRY: &str = "country";
pub const DATE_ADDED: &str = "date_added";
pub const RELEASE_YEAR: &str = "release_year";
pub const RATING: &str = "rating";
pub const LISTED_IN: &str = "listed_in";
pub const DESCRIPTION: &str = "description";
pub const MONTH_ADDED: &str = "month_added";
pub const YEAR_ADDED: &str = "year_added";
pub const CAST_COUNT: &str = "cast_count";

/// Columns the source header must name.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    SHOW_TYPE,
    TITLE,
    DIRECTOR,
    CAST,
    COUNTRY,
    DATE_ADDED,
    RELEASE_YEAR,
    RATING,
    LISTED_IN,
];

/// Columns that always hold text, whatever schema inference decided.
pub const TEXT_COLUMNS: [&str; 8] = [
    SHOW_TYPE, TITLE, DIRECTOR, CAST, COUNTRY, DATE_ADDED, RATING, LISTED_IN,
];

/// `NaiveDate::num_days_from_ce` of 1970-01-01, the epoch of polars dates.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{column}' has {len} values but the table has {height} rows")]
    LengthMismatch {
        column: String,
        len: usize,
        height: usize,
    },
    #[error("Column '{column}' holds day {days}, which is outside the calendar")]
    DateOutOfRange { column: String, days: i64 },
}

/// Convert a calendar date into days since the Unix epoch.
pub fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert days since the Unix epoch back into a calendar date.
pub fn date_from_epoch_days(days: i64) -> Option<NaiveDate> {
    let days = i32::try_from(days).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// The single catalog table threaded through load, clean and analyze.
#[derive(Debug, Clone, Default)]
pub struct CatalogTable {
    df: DataFrame,
}

impl CatalogTable {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df
            .get_column_names()
            .iter()
            .any(|column| column.as_str() == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.df
            .column(name)
            .map_err(|_| TableError::MissingColumn(name.to_string()))
    }

    /// Text values of a string column, in row order.
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<&str>>, TableError> {
        let column = self.column(name)?;
        Ok(column.str()?.into_iter().collect())
    }

    /// Values of a numeric (or date) column widened to `i64`.
    pub fn int_values(&self, name: &str) -> Result<Vec<Option<i64>>, TableError> {
        let widened = self.column(name)?.cast(&DataType::Int64)?;
        Ok(widened.i64()?.into_iter().collect())
    }

    /// Values of a numeric column as `f64`, for statistics.
    pub fn float_values(&self, name: &str) -> Result<Vec<Option<f64>>, TableError> {
        let widened = self.column(name)?.cast(&DataType::Float64)?;
        Ok(widened.f64()?.into_iter().collect())
    }

    /// Values of a date column as calendar dates.
    pub fn date_values(&self, name: &str) -> Result<Vec<Option<NaiveDate>>, TableError> {
        self.int_values(name)?
            .into_iter()
            .map(|days| match days {
                Some(days) => date_from_epoch_days(days)
                    .map(Some)
                    .ok_or_else(|| TableError::DateOutOfRange {
                        column: name.to_string(),
                        days,
                    }),
                None => Ok(None),
            })
            .collect()
    }

    /// Add or replace an integer column.
    pub fn set_int_column(&mut self, name: &str, values: Vec<i64>) -> Result<(), TableError> {
        if values.len() != self.df.height() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                len: values.len(),
                height: self.df.height(),
            });
        }
        self.df.with_column(Column::new(name.into(), values))?;
        Ok(())
    }

    /// Missing-value count per column, in column order.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// One-line shape summary: row count and `name: dtype` per column.
    pub fn overview(&self) -> String {
        let columns: Vec<String> = self
            .df
            .get_columns()
            .iter()
            .map(|col| format!("{}: {}", col.name(), col.dtype()))
            .collect();
        format!(
            "{} rows x {} columns [{}]",
            self.df.height(),
            self.df.width(),
            columns.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_conversion_round_trips() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(days_since_epoch(epoch), 0);

        let date = NaiveDate::from_ymd_opt(2021, 11, 26).unwrap();
        let days = days_since_epoch(date);
        assert_eq!(date_from_epoch_days(days as i64), Some(date));
    }

    #[test]
    fn set_int_column_rejects_wrong_length() {
        let df = DataFrame::new(vec![Column::new("title".into(), ["a", "b"])]).unwrap();
        let mut table = CatalogTable::new(df);

        let err = table.set_int_column(CAST_COUNT, vec![1]).unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { len: 1, height: 2, .. }));

        table.set_int_column(CAST_COUNT, vec![3, 1]).unwrap();
        assert_eq!(table.int_values(CAST_COUNT).unwrap(), vec![Some(3), Some(1)]);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = CatalogTable::default();
        let err = table.text_values(COUNTRY).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(name) if name == COUNTRY));
    }
}

//! CSV Data Loader Module
//! Reads the catalog CSV into a typed table using Polars.

use crate::data::table::{CatalogTable, RELEASE_YEAR, REQUIRED_COLUMNS, TEXT_COLUMNS};
use log::{debug, info};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' is missing from the header")]
    MissingColumn(String),
    #[error("Line {line} has {found} fields but the header has {expected}")]
    FieldCount { line: u64, expected: u64, found: u64 },
    #[error("Failed to scan CSV: {0}")]
    ScanError(#[from] csv::Error),
    #[error("Column '{column}' must hold whole numbers, found {dtype}")]
    NonIntegerColumn { column: String, dtype: DataType },
}

/// Loads the catalog CSV with Polars schema inference.
pub struct CatalogLoader {
    infer_schema_length: Option<usize>,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogLoader {
    /// Loader that infers column types from every row of the file.
    pub fn new() -> Self {
        Self {
            infer_schema_length: None,
        }
    }

    /// Limit schema inference to the first `rows` records.
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Load a catalog CSV file.
    ///
    /// Empty fields load as missing values and `date_added` stays raw text.
    pub fn load(&self, path: &Path) -> Result<CatalogTable, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        Self::check_field_counts(path)?;

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .finish()?
            .collect()?;

        Self::validate_header(&df)?;
        let df = Self::coerce_text_columns(df)?;
        Self::validate_integer_column(&df, RELEASE_YEAR)?;

        let table = CatalogTable::new(df);
        info!(
            "Loaded {} rows x {} columns from {}",
            table.height(),
            table.column_names().len(),
            path.display()
        );
        debug!("Loaded table: {}", table.overview());
        Ok(table)
    }

    /// Polars pads short rows with nulls, so field counts are checked on the raw records.
    fn check_field_counts(path: &Path) -> Result<(), LoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(path)?;
        let mut record = csv::ByteRecord::new();
        while reader
            .read_byte_record(&mut record)
            .map_err(Self::scan_error)?
        {}
        Ok(())
    }

    fn scan_error(err: csv::Error) -> LoaderError {
        match err.kind() {
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => LoaderError::FieldCount {
                line: pos.as_ref().map_or(0, |p| p.line()),
                expected: *expected_len,
                found: *len,
            },
            _ => LoaderError::ScanError(err),
        }
    }

    fn validate_header(df: &DataFrame) -> Result<(), LoaderError> {
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        match REQUIRED_COLUMNS.iter().find(|required| !names.contains(required)) {
            Some(missing) => Err(LoaderError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Inference may type an all-numeric or all-empty text column otherwise.
    fn coerce_text_columns(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        for name in TEXT_COLUMNS {
            let column = df.column(name)?;
            if column.dtype() != &DataType::String {
                debug!("Coercing column '{}' from {} to str", name, column.dtype());
                let text = column.cast(&DataType::String)?;
                df.with_column(text)?;
            }
        }
        Ok(df)
    }

    fn validate_integer_column(df: &DataFrame, name: &str) -> Result<(), LoaderError> {
        let dtype = df.column(name)?.dtype();
        if matches!(
            dtype,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        ) {
            Ok(())
        } else {
            Err(LoaderError::NonIntegerColumn {
                column: name.to_string(),
                dtype: dtype.clone(),
            })
        }
    }
}

/// Load a catalog CSV with the default loader settings.
pub fn load(path: impl AsRef<Path>) -> Result<CatalogTable, LoaderError> {
    CatalogLoader::new().load(path.as_ref())
}

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use catalog_eda::charts::{ChartRenderer, ChartSpec, RenderError};
use catalog_eda::data::{self, CatalogTable, DataCleaner};
use tempfile::{tempdir, TempDir};

pub const SAMPLE_FILE: &str = "catalog_sample.csv";

pub const HEADER: &str = "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes a catalog CSV with the standard header.
    ///
    /// Empty fields stay bare so they load as missing values; other text is quoted.
    pub fn write_catalog(&self, name: &str, rows: &[CatalogRow]) -> PathBuf {
        let mut contents = String::from(HEADER);
        contents.push('\n');
        for row in rows {
            contents.push_str(&row.to_csv_line());
            contents.push('\n');
        }
        self.write(name, &contents)
    }
}

/// One source record; empty strings are missing values.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub show_type: &'static str,
    pub title: &'static str,
    pub director: &'static str,
    pub cast: &'static str,
    pub country: &'static str,
    pub date_added: &'static str,
    pub release_year: i32,
    pub rating: &'static str,
    pub listed_in: &'static str,
}

impl Default for CatalogRow {
    fn default() -> Self {
        Self {
            show_type: "Movie",
            title: "Untitled",
            director: "Jane Doe",
            cast: "Actor One",
            country: "United States",
            date_added: "November 12, 2019",
            release_year: 2019,
            rating: "PG",
            listed_in: "Family",
        }
    }
}

impl CatalogRow {
    fn to_csv_line(&self) -> String {
        let quote = |field: &str| {
            if field.is_empty() {
                String::new()
            } else {
                format!("\"{}\"", field.replace('"', "\"\""))
            }
        };
        [
            "s0".to_string(),
            quote(self.show_type),
            quote(self.title),
            quote(self.director),
            quote(self.cast),
            quote(self.country),
            quote(self.date_added),
            self.release_year.to_string(),
            quote(self.rating),
            "90 min".to_string(),
            quote(self.listed_in),
            "A description.".to_string(),
        ]
        .join(",")
    }
}

/// Loads and cleans the shared sample catalog.
pub fn cleaned_sample() -> CatalogTable {
    let table = data::load(fixture_path(SAMPLE_FILE)).expect("load sample");
    DataCleaner::clean(table).expect("clean sample")
}

/// Loads and cleans a catalog written from `rows`.
pub fn cleaned_rows(rows: &[CatalogRow]) -> CatalogTable {
    let workspace = TestWorkspace::new();
    let path = workspace.write_catalog("catalog.csv", rows);
    let table = data::load(&path).expect("load catalog");
    DataCleaner::clean(table).expect("clean catalog")
}

/// Records every chart it is asked to draw.
#[derive(Default)]
pub struct RecordingRenderer {
    pub charts: Mutex<Vec<ChartSpec>>,
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<PathBuf, RenderError> {
        self.charts.lock().expect("renderer lock").push(chart.clone());
        Ok(PathBuf::from(format!("{}.png", chart.name)))
    }
}

/// Fails every chart.
pub struct FailingRenderer;

impl ChartRenderer for FailingRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<PathBuf, RenderError> {
        Err(RenderError::Draw {
            name: chart.name.clone(),
            message: "backend unavailable".to_string(),
        })
    }
}

//! Data module - CSV loading, cleaning and typed table access

mod cleaner;
mod loader;
pub mod table;

pub use cleaner::{parse_date_added, CleanError, DataCleaner, DATE_FORMATS, NOT_SPECIFIED, UNKNOWN};
pub use loader::{load, CatalogLoader, LoaderError};
pub use table::{CatalogTable, TableError};

//! Statistics module - aggregation utilities and calculations

pub mod aggregate;
mod calculator;

pub use aggregate::PivotTable;
pub use calculator::{CorrelationMatrix, DescriptiveStats, StatsCalculator};

//! Charts module - Chart specs and rendering

mod renderer;
pub mod spec;

pub use renderer::{ChartRenderer, PlottersRenderer, RenderError};
pub use spec::{ChartData, ChartKind, ChartSpec};

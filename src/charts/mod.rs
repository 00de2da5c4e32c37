//! Charts module - Static chart rendering

mod renderer;

pub use renderer::{chart_file_name, heat_color, ChartError, StaticChartRenderer, PALETTE};

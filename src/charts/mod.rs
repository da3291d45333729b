//! Charts module - interactive figure payload and static PNG snapshot

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::{StaticChartRenderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};

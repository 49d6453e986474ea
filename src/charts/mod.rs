//! Charts module - chart kinds, figure transforms, and the two rendering backends

mod kind;
mod plotter;
mod renderer;
mod transform;

pub use kind::ChartKind;
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use transform::{build_figures, ChartError, Figure};

//! Charts module - Renderer trait and its implementations

mod leaflet;
mod plotter;
mod renderer;

use crate::pipeline::{StationMap, TrendDashboard};
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

pub use leaflet::LeafletMap;
pub use plotter::{InteractivePlotter, PALETTE};
pub use renderer::StaticChartRenderer;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No stations with coordinates; nothing to map")]
    EmptyMap,
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Values out of plottable range: {0}")]
    OutOfRange(String),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode map data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Presentation sink for the two dashboard views. Implementations hold no
/// state between calls that affects what they draw.
pub trait Renderer {
    /// Stacked trend charts, one per panel.
    fn render_trends(&mut self, dashboard: &TrendDashboard) -> Result<(), RenderError>;

    /// One marker per station. Must return [`RenderError::EmptyMap`] when the
    /// map has no center.
    fn render_stations(&mut self, map: &StationMap) -> Result<(), RenderError>;
}

/// Dates are plotted as days since the common era.
pub(crate) fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Axis label for a plotted x value.
pub(crate) fn x_to_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod station_viewer;

pub use app::DashboardApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use station_viewer::StationViewer;

use crate::pipeline::{LoadNotice, TabFailure};
use egui::{Color32, RichText};

pub(crate) const SUCCESS_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
pub(crate) const INFO_COLOR: Color32 = Color32::from_rgb(23, 162, 184);
pub(crate) const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Banner saying where the tab's data came from.
pub(crate) fn show_notice(ui: &mut egui::Ui, notice: &LoadNotice) {
    let color = match notice {
        LoadNotice::Uploaded(_) => SUCCESS_COLOR,
        LoadNotice::UsingDefault(_) => INFO_COLOR,
    };
    ui.label(RichText::new(notice.text()).color(color));
}

/// Banner for a halted tab.
pub(crate) fn show_failure(ui: &mut egui::Ui, failure: &TabFailure) {
    egui::Frame::none()
        .stroke(egui::Stroke::new(1.5, ERROR_COLOR))
        .rounding(5.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.label(RichText::new(&failure.message).color(ERROR_COLOR));
        });
}

//! Control Panel Widget
//! Left side panel with the data inputs and analysis settings.

use crate::data::Characteristic;
use egui::{Color32, ComboBox, RichText};

/// Left side control panel with file selection and the comparison picker.
pub struct ControlPanel {
    pub results_file: Option<String>,
    pub stations_file: Option<String>,
    pub comparison: Characteristic,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            results_file: None,
            stations_file: None,
            comparison: Characteristic::default(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new(comparison: Characteristic) -> Self {
        Self {
            comparison,
            ..Self::default()
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("💧 Water Quality")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Analysis Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Input Section =====
        ui.label(RichText::new("📁 Data Input").size(14.0).strong());
        ui.label(RichText::new("Upload your water quality data files:").size(11.0));
        ui.add_space(5.0);

        if let Some(picked) = Self::file_row(ui, "Measurement Data (CSV)", &self.results_file) {
            action = match picked {
                FileRowAction::Browse => ControlPanelAction::BrowseResults,
                FileRowAction::Clear => ControlPanelAction::ClearResults,
            };
        }
        ui.add_space(5.0);
        if let Some(picked) = Self::file_row(ui, "Station Data (CSV)", &self.stations_file) {
            action = match picked {
                FileRowAction::Browse => ControlPanelAction::BrowseStations,
                FileRowAction::Clear => ControlPanelAction::ClearStations,
            };
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Analysis Settings Section =====
        ui.label(RichText::new("⚙️ Analysis Settings").size(14.0).strong());
        ui.add_space(5.0);
        ui.label("Select second characteristic to compare with Aluminum");

        ComboBox::from_id_salt("comparison")
            .width(220.0)
            .selected_text(self.comparison.label())
            .show_ui(ui, |ui| {
                for choice in Characteristic::COMPARISONS {
                    if ui
                        .selectable_label(self.comparison == choice, choice.label())
                        .clicked()
                        && self.comparison != choice
                    {
                        self.comparison = choice;
                        action = ControlPanelAction::ComparisonChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::ExportCharts;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn file_row(ui: &mut egui::Ui, label: &str, file: &Option<String>) -> Option<FileRowAction> {
        let mut picked = None;

        ui.label(RichText::new(label).size(12.0));
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let text = file.as_deref().unwrap_or("Using default file");
                    ui.label(RichText::new(text).size(12.0).color(if file.is_some() {
                        Color32::WHITE
                    } else {
                        Color32::GRAY
                    }));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if file.is_some() && ui.small_button("✖").clicked() {
                            picked = Some(FileRowAction::Clear);
                        }
                        if ui.button("📂 Browse").clicked() {
                            picked = Some(FileRowAction::Browse);
                        }
                    });
                });
            });

        picked
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

enum FileRowAction {
    Browse,
    Clear,
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseResults,
    BrowseStations,
    ClearResults,
    ClearStations,
    ComparisonChanged,
    ExportCharts,
}

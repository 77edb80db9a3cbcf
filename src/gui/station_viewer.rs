//! Station Viewer Widget
//! Geographic View tab: station table and marker map.

use crate::charts::{InteractivePlotter, LeafletMap, RenderError, Renderer};
use crate::gui::{show_failure, show_notice, SUCCESS_COLOR};
use crate::pipeline::{StationMap, StationTab};
use egui::{Color32, RichText, ScrollArea};
use tracing::{error, info};

const MAP_PAGE: &str = "water_quality_stations.html";

/// Station table and map.
pub struct StationViewer {
    pub tab: StationTab,
}

impl StationViewer {
    pub fn new(tab: StationTab) -> Self {
        Self { tab }
    }

    /// Draw the tab. Returns a status line when the browser map was opened
    /// or failed to open.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<String> {
        ui.heading(RichText::new("Water Quality Monitoring Locations").strong());
        ui.add_space(8.0);

        let (notice, map) = match &self.tab {
            StationTab::Failed(failure) => {
                show_failure(ui, failure);
                return None;
            }
            StationTab::Ready { notice, map } => (notice, map),
        };

        show_notice(ui, notice);
        ui.label(RichText::new(map.summary()).color(SUCCESS_COLOR));
        ui.add_space(8.0);

        let mut status = None;
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::CollapsingHeader::new("View Station Data")
                    .default_open(false)
                    .show(ui, |ui| Self::draw_station_table(ui, map));

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Monitoring Locations Map").size(16.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🌐 Open map in browser").clicked() {
                            status = Some(Self::open_in_browser(map));
                        }
                    });
                });
                ui.add_space(5.0);

                let rendered = InteractivePlotter::new(ui).render_stations(map);
                match rendered {
                    Ok(()) => {}
                    Err(RenderError::EmptyMap) => {
                        ui.label(
                            RichText::new("No stations with coordinates to display.")
                                .color(Color32::GRAY),
                        );
                    }
                    Err(e) => {
                        ui.colored_label(
                            Color32::from_rgb(220, 53, 69),
                            format!("An error occurred: {}", e),
                        );
                    }
                }
            });

        status
    }

    fn draw_station_table(ui: &mut egui::Ui, map: &StationMap) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("station_table_scroll")
                    .max_height(240.0)
                    .show(ui, |ui| {
                        egui::Grid::new("station_table")
                            .striped(true)
                            .min_col_width(80.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                ui.label(RichText::new("MonitoringLocationName").strong());
                                ui.label(RichText::new("MonitoringLocationTypeName").strong());
                                ui.label(RichText::new("LatitudeMeasure").strong());
                                ui.label(RichText::new("LongitudeMeasure").strong());
                                ui.end_row();

                                for station in map.stations.stations() {
                                    ui.label(&station.name);
                                    ui.label(&station.location_type);
                                    ui.label(format!("{:.6}", station.latitude));
                                    ui.label(format!("{:.6}", station.longitude));
                                    ui.end_row();
                                }
                            });
                    });
            });
    }

    fn open_in_browser(map: &StationMap) -> String {
        let path = std::env::temp_dir().join(MAP_PAGE);
        let result = LeafletMap::build(map, "Water Quality Monitoring Locations")
            .and_then(|page| page.write_to(&path))
            .map_err(|e| e.to_string())
            .and_then(|()| open::that(&path).map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                info!(path = %path.display(), "opened station map");
                format!("Opened map: {}", path.display())
            }
            Err(e) => {
                error!(error = %e, "could not open station map");
                format!("Error: {}", e)
            }
        }
    }
}

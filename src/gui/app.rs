//! Water Quality Dashboard Main Application
//! Main window with control panel and the two analysis tabs.

use crate::charts::{Renderer, StaticChartRenderer};
use crate::data::Upload;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, StationViewer};
use crate::pipeline::{
    run_station_tab, run_trend_tab, DashboardInputs, FallbackPaths, StationTab, TrendTab,
};
use egui::SidePanel;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashboardTab {
    Trends,
    Stations,
}

/// Which upload slot a file dialog fills.
#[derive(Debug, Clone, Copy)]
enum UploadSlot {
    Results,
    Stations,
}

/// Main application window.
pub struct DashboardApp {
    paths: FallbackPaths,
    export_dir: PathBuf,
    inputs: DashboardInputs,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    station_viewer: StationViewer,
    tab: DashboardTab,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        inputs: DashboardInputs,
        paths: FallbackPaths,
        export_dir: PathBuf,
    ) -> Self {
        let mut control_panel = ControlPanel::new(inputs.comparison);
        control_panel.results_file = inputs.results_upload.as_ref().map(|u| u.name.clone());
        control_panel.stations_file = inputs.stations_upload.as_ref().map(|u| u.name.clone());

        let chart_viewer = ChartViewer::new(run_trend_tab(&inputs, &paths));
        let station_viewer = StationViewer::new(run_station_tab(&inputs, &paths));

        Self {
            paths,
            export_dir,
            inputs,
            control_panel,
            chart_viewer,
            station_viewer,
            tab: DashboardTab::Trends,
        }
    }

    fn refresh_trends(&mut self) {
        self.chart_viewer.tab = run_trend_tab(&self.inputs, &self.paths);
    }

    fn refresh_stations(&mut self) {
        self.station_viewer.tab = run_station_tab(&self.inputs, &self.paths);
    }

    /// Handle CSV file selection for one of the pipelines
    fn handle_browse(&mut self, slot: UploadSlot) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return; // User cancelled
        };

        let upload = match Upload::from_path(&path) {
            Ok(upload) => upload,
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not read picked file");
                self.control_panel
                    .set_status(&format!("Error: could not read {}: {}", path.display(), e));
                return;
            }
        };

        info!(file = %upload.name, ?slot, "file uploaded");
        match slot {
            UploadSlot::Results => {
                self.control_panel.results_file = Some(upload.name.clone());
                self.inputs.results_upload = Some(upload);
                self.refresh_trends();
                self.tab = DashboardTab::Trends;
            }
            UploadSlot::Stations => {
                self.control_panel.stations_file = Some(upload.name.clone());
                self.inputs.stations_upload = Some(upload);
                self.refresh_stations();
                self.tab = DashboardTab::Stations;
            }
        }
        self.control_panel.set_status("Ready");
    }

    fn handle_clear(&mut self, slot: UploadSlot) {
        match slot {
            UploadSlot::Results => {
                self.control_panel.results_file = None;
                self.inputs.results_upload = None;
                self.refresh_trends();
            }
            UploadSlot::Stations => {
                self.control_panel.stations_file = None;
                self.inputs.stations_upload = None;
                self.refresh_stations();
            }
        }
    }

    /// Handle static export - PNG trend charts and HTML station map
    fn handle_export(&mut self) {
        let mut renderer = StaticChartRenderer::new(&self.export_dir);
        let mut problems: Vec<String> = Vec::new();

        if let TrendTab::Ready { dashboard, .. } = &self.chart_viewer.tab {
            if let Err(e) = renderer.render_trends(dashboard) {
                problems.push(format!("trends: {}", e));
            }
        }
        if let StationTab::Ready { map, .. } = &self.station_viewer.tab {
            if let Err(e) = renderer.render_stations(map) {
                problems.push(format!("stations: {}", e));
            }
        }

        let status = if !problems.is_empty() {
            format!("Error: {}", problems.join("; "))
        } else if renderer.written().is_empty() {
            "Nothing to export".to_string()
        } else {
            format!(
                "Exported {} file(s) to {}",
                renderer.written().len(),
                self.export_dir.display()
            )
        };
        self.control_panel.set_status(&status);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseResults => self.handle_browse(UploadSlot::Results),
                        ControlPanelAction::BrowseStations => {
                            self.handle_browse(UploadSlot::Stations)
                        }
                        ControlPanelAction::ClearResults => self.handle_clear(UploadSlot::Results),
                        ControlPanelAction::ClearStations => self.handle_clear(UploadSlot::Stations),
                        ControlPanelAction::ComparisonChanged => {
                            self.inputs.comparison = self.control_panel.comparison;
                            self.refresh_trends();
                        }
                        ControlPanelAction::ExportCharts => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Tab bar
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, DashboardTab::Trends, "📈 Trend Analysis");
                ui.selectable_value(&mut self.tab, DashboardTab::Stations, "🗺 Geographic View");
            });
        });

        // Central panel - active tab
        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            DashboardTab::Trends => self.chart_viewer.show(ui),
            DashboardTab::Stations => {
                if let Some(status) = self.station_viewer.show(ui) {
                    self.control_panel.set_status(&status);
                }
            }
        });
    }
}

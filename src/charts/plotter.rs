//! Chart Plotter Module
//! Interactive trend charts and station map drawn with egui_plot.

use crate::charts::{date_to_x, x_to_label, RenderError, Renderer};
use crate::data::{GeoPoint, Trend, TrendSet};
use crate::pipeline::{StationMap, TrendDashboard, TrendPanel};
use egui::{Color32, RichText};
use egui_plot::{Corner, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

/// Station marker color
pub const MARKER_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

/// Color palette for sites
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),  // Blue
    Color32::from_rgb(255, 127, 14),  // Orange
    Color32::from_rgb(44, 160, 44),   // Green
    Color32::from_rgb(214, 39, 40),   // Red
    Color32::from_rgb(148, 103, 189), // Purple
    Color32::from_rgb(140, 86, 75),   // Brown
    Color32::from_rgb(227, 119, 194), // Pink
    Color32::from_rgb(127, 127, 127), // Gray
    Color32::from_rgb(188, 189, 34),  // Olive
    Color32::from_rgb(23, 190, 207),  // Cyan
];

/// Draws dashboard views into an egui `Ui`.
pub struct InteractivePlotter<'ui> {
    ui: &'ui mut egui::Ui,
    chart_height: f32,
}

impl<'ui> InteractivePlotter<'ui> {
    pub fn new(ui: &'ui mut egui::Ui) -> Self {
        Self {
            ui,
            chart_height: 320.0,
        }
    }

    pub fn with_chart_height(mut self, height: f32) -> Self {
        self.chart_height = height;
        self
    }

    fn draw_trend_panel(ui: &mut egui::Ui, panel: &TrendPanel, index: usize, height: f32) {
        ui.label(RichText::new(panel.title()).size(16.0).strong());
        ui.add_space(4.0);

        match &panel.trend {
            Trend::Empty { .. } => {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(5.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_min_height(height * 0.4);
                        ui.centered_and_justified(|ui| {
                            ui.label(
                                RichText::new(panel.title())
                                    .size(14.0)
                                    .color(Color32::GRAY),
                            );
                        });
                    });
            }
            Trend::Data(set) => Self::draw_trend_plot(ui, set, &panel.y_label(), index, height),
        }
    }

    /// X-axis: dates, Y-axis: site means
    fn draw_trend_plot(ui: &mut egui::Ui, set: &TrendSet, y_label: &str, index: usize, height: f32) {
        Plot::new(format!("trend_{}_{}", index, set.characteristic))
            .height(height)
            .legend(Legend::default().position(Corner::RightTop))
            .x_axis_label("Date")
            .y_axis_label(y_label.to_string())
            .allow_scroll(false)
            .x_axis_formatter(|mark, _range| x_to_label(mark.value))
            .label_formatter(|name, value| {
                if name.is_empty() {
                    format!("{}\n{:.3}", x_to_label(value.x), value.y)
                } else {
                    format!("{}\n{}\n{:.3}", name, x_to_label(value.x), value.y)
                }
            })
            .show(ui, |plot_ui| {
                for (i, (site, points)) in set.sites.iter().enumerate() {
                    let color = PALETTE[i % PALETTE.len()];
                    let xy: Vec<[f64; 2]> = points
                        .iter()
                        .map(|p| [date_to_x(p.date), p.value])
                        .collect();

                    plot_ui.line(
                        Line::new(PlotPoints::from(xy.clone()))
                            .color(color)
                            .width(1.5)
                            .name(site),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(xy))
                            .radius(3.0)
                            .color(color)
                            .name(site),
                    );
                }
            });
    }

    /// X-axis: longitude, Y-axis: latitude
    fn draw_station_map(ui: &mut egui::Ui, map: &StationMap, center: GeoPoint, height: f32) {
        Plot::new("station_map")
            .height(height)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .allow_scroll(false)
            .include_x(center.longitude)
            .include_y(center.latitude)
            .label_formatter(|name, value| {
                if name.is_empty() {
                    format!("{:.4}, {:.4}", value.y, value.x)
                } else {
                    format!("{}\n{:.4}, {:.4}", name, value.y, value.x)
                }
            })
            .show(ui, |plot_ui| {
                for station in map.stations.stations() {
                    plot_ui.points(
                        Points::new(vec![[station.longitude, station.latitude]])
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(6.0)
                            .color(MARKER_COLOR)
                            .name(format!(
                                "{}\nType: {}",
                                station.name, station.location_type
                            )),
                    );
                }

                plot_ui.points(
                    Points::new(vec![[center.longitude, center.latitude]])
                        .shape(MarkerShape::Plus)
                        .radius(5.0)
                        .color(Color32::GRAY),
                );
            });
    }
}

impl Renderer for InteractivePlotter<'_> {
    fn render_trends(&mut self, dashboard: &TrendDashboard) -> Result<(), RenderError> {
        for (index, panel) in dashboard.panels.iter().enumerate() {
            if index > 0 {
                self.ui.add_space(15.0);
                self.ui.separator();
            }
            Self::draw_trend_panel(self.ui, panel, index, self.chart_height);
        }
        Ok(())
    }

    fn render_stations(&mut self, map: &StationMap) -> Result<(), RenderError> {
        let center = map.center().ok_or(RenderError::EmptyMap)?;
        if !center.is_finite() {
            return Err(RenderError::OutOfRange("map center".into()));
        }
        Self::draw_station_map(self.ui, map, center, self.chart_height * 1.6);
        Ok(())
    }
}

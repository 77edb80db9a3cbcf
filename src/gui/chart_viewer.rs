//! Chart Viewer Widget
//! Trend Analysis tab: the two stacked characteristic charts.

use crate::charts::{InteractivePlotter, Renderer};
use crate::gui::{show_failure, show_notice};
use crate::pipeline::TrendTab;
use egui::{RichText, ScrollArea};

const CHART_HEIGHT: f32 = 320.0;

/// Scrollable trend chart area.
pub struct ChartViewer {
    pub tab: TrendTab,
}

impl ChartViewer {
    pub fn new(tab: TrendTab) -> Self {
        Self { tab }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("Water Quality Trend Analysis").strong());
        ui.add_space(8.0);

        match &self.tab {
            TrendTab::Failed(failure) => show_failure(ui, failure),
            TrendTab::Ready { notice, dashboard } => {
                show_notice(ui, notice);
                ui.add_space(10.0);

                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let result = InteractivePlotter::new(ui)
                            .with_chart_height(CHART_HEIGHT)
                            .render_trends(dashboard);
                        if let Err(e) = result {
                            ui.colored_label(
                                egui::Color32::from_rgb(220, 53, 69),
                                format!("An error occurred: {}", e),
                            );
                        }
                    });
            }
        }
    }
}

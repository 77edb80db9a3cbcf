//! Headless export: run both pipelines once and render them to files.

use crate::charts::{Renderer, StaticChartRenderer};
use crate::pipeline::{
    run_station_tab, run_trend_tab, DashboardInputs, FallbackPaths, StationTab, TrendTab,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// What one export run produced. Each tab reports independently.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    /// (tab name, user-facing message)
    pub failures: Vec<(&'static str, String)>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn export_dashboard(
    inputs: &DashboardInputs,
    paths: &FallbackPaths,
    out_dir: &Path,
) -> ExportReport {
    let mut renderer = StaticChartRenderer::new(out_dir);
    let mut report = ExportReport::default();

    match run_trend_tab(inputs, paths) {
        TrendTab::Ready { notice, dashboard } => {
            info!("{}", notice.text());
            if let Err(e) = renderer.render_trends(&dashboard) {
                error!(error = %e, "trend export failed");
                report.failures.push(("trends", format!("An error occurred: {}", e)));
            }
        }
        TrendTab::Failed(failure) => report.failures.push(("trends", failure.message)),
    }

    match run_station_tab(inputs, paths) {
        StationTab::Ready { notice, map } => {
            info!("{}", notice.text());
            info!("{}", map.summary());
            if let Err(e) = renderer.render_stations(&map) {
                error!(error = %e, "station export failed");
                report.failures.push(("stations", e.to_string()));
            }
        }
        StationTab::Failed(failure) => report.failures.push(("stations", failure.message)),
    }

    report.written = renderer.written().to_vec();
    report
}

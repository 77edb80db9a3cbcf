//! Water Quality Dashboard
//!
//! Opens the dashboard window, or with `--export` renders both views to files.

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use water_quality::config::Config;
use water_quality::export::export_dashboard;
use water_quality::gui::DashboardApp;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,water_quality=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = Config::parse();
    info!(?config, "starting water quality dashboard");

    let inputs = config.inputs().context("failed to read supplied data file")?;
    let paths = config.fallback_paths();

    if let Some(out_dir) = &config.export {
        let report = export_dashboard(&inputs, &paths, out_dir);
        for path in &report.written {
            println!("{}", path.display());
        }
        for (tab, message) in &report.failures {
            warn!(tab, "{}", message);
            eprintln!("{}: {}", tab, message);
        }
        return Ok(());
    }

    let export_dir = config.export_dir();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Water Quality Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Water Quality Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, inputs, paths, export_dir)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run dashboard window: {e}"))
}

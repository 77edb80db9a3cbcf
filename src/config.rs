//! Command-line and environment configuration.

use crate::data::{Characteristic, Upload};
use crate::pipeline::{DashboardInputs, FallbackPaths};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "water-quality-dashboard")]
#[command(about = "Explore water-quality trends and monitoring station locations")]
pub struct Config {
    /// Measurement CSV used when no measurement file is supplied
    #[arg(long, env = "WQ_DEFAULT_RESULTS", default_value = "narrowresult.csv")]
    pub default_results: PathBuf,

    /// Station CSV used when no station file is supplied
    #[arg(long, env = "WQ_DEFAULT_STATIONS", default_value = "station.csv")]
    pub default_stations: PathBuf,

    /// Measurement CSV to analyse (treated as an upload)
    #[arg(long, env = "WQ_RESULTS")]
    pub results: Option<PathBuf>,

    /// Station CSV to map (treated as an upload)
    #[arg(long, env = "WQ_STATIONS")]
    pub stations: Option<PathBuf>,

    /// Characteristic compared against Aluminum
    #[arg(long, env = "WQ_CHARACTERISTIC", default_value = "Ammonium")]
    pub characteristic: Characteristic,

    /// Write trends.png and stations.html here and exit instead of opening a window
    #[arg(long, env = "WQ_EXPORT_DIR")]
    pub export: Option<PathBuf>,
}

impl Config {
    pub fn fallback_paths(&self) -> FallbackPaths {
        FallbackPaths {
            results: self.default_results.clone(),
            stations: self.default_stations.clone(),
        }
    }

    /// Read the supplied files into memory. A file that cannot be read is an
    /// error here rather than a silent switch to the default.
    pub fn inputs(&self) -> std::io::Result<DashboardInputs> {
        let read = |path: &Option<PathBuf>| path.as_deref().map(Upload::from_path).transpose();
        Ok(DashboardInputs {
            results_upload: read(&self.results)?,
            stations_upload: read(&self.stations)?,
            comparison: self.characteristic,
        })
    }

    /// Directory the GUI export button writes to.
    pub fn export_dir(&self) -> PathBuf {
        self.export.clone().unwrap_or_else(|| PathBuf::from("export"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_files() {
        let config = Config::try_parse_from(["water-quality-dashboard"]).unwrap();
        assert_eq!(config.fallback_paths(), FallbackPaths::default());
        assert_eq!(config.characteristic, Characteristic::Ammonium);
        assert!(config.export.is_none());
    }

    #[test]
    fn characteristic_flag_uses_labels() {
        let config = Config::try_parse_from([
            "water-quality-dashboard",
            "--characteristic",
            "Escherichia coli",
        ])
        .unwrap();
        assert_eq!(config.characteristic, Characteristic::EscherichiaColi);

        assert!(Config::try_parse_from(["water-quality-dashboard", "--characteristic", "Radon"])
            .is_err());
    }
}

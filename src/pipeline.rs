//! Pipeline Module
//! Wires Loader -> Transformer for each dashboard tab and turns every failure
//! into a tab-local message. Nothing here touches a renderer.

use crate::data::{
    Characteristic, DataLoader, GeoPoint, LoadError, StationError, StationExtractor, StationSet,
    TableOrigin, Trend, TrendError, TrendExtractor, Upload,
};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::{error, info};

/// Default files used when nothing was uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPaths {
    pub results: PathBuf,
    pub stations: PathBuf,
}

impl Default for FallbackPaths {
    fn default() -> Self {
        Self {
            results: PathBuf::from("narrowresult.csv"),
            stations: PathBuf::from("station.csv"),
        }
    }
}

/// Everything the user controls, passed in whole on every recomputation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardInputs {
    pub results_upload: Option<Upload>,
    pub stations_upload: Option<Upload>,
    pub comparison: Characteristic,
}

/// One chart's worth of trend data.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPanel {
    pub trend: Trend,
}

impl TrendPanel {
    pub fn title(&self) -> String {
        match &self.trend {
            Trend::Data(set) => format!("Trend of {} Measurements", set.characteristic),
            Trend::Empty { characteristic } => format!("No {} data available", characteristic),
        }
    }

    /// Empty for placeholder panels.
    pub fn y_label(&self) -> String {
        match &self.trend {
            Trend::Data(set) => match &set.unit {
                Some(unit) => format!("{} ({})", set.characteristic, unit),
                None => set.characteristic.clone(),
            },
            Trend::Empty { .. } => String::new(),
        }
    }
}

/// The two stacked trend charts: Aluminum, then the chosen comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendDashboard {
    pub panels: Vec<TrendPanel>,
}

impl TrendDashboard {
    pub fn build(df: &DataFrame, comparison: Characteristic) -> Result<Self, TrendError> {
        let panels = [Characteristic::PRIMARY, comparison]
            .into_iter()
            .map(|c| TrendExtractor::extract(df, c.label()).map(|trend| TrendPanel { trend }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { panels })
    }
}

/// Stations plus the point the map centers on.
#[derive(Debug, Clone, PartialEq)]
pub struct StationMap {
    pub stations: StationSet,
}

impl StationMap {
    pub fn center(&self) -> Option<GeoPoint> {
        self.stations.center()
    }

    pub fn summary(&self) -> String {
        format!("Found {} unique monitoring locations", self.stations.len())
    }
}

/// Why a tab stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Load,
    Schema,
    Other,
}

/// A halted tab and the message to show in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// How a loaded table should be announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadNotice {
    /// The user's own file.
    Uploaded(String),
    /// The default file stood in.
    UsingDefault(String),
}

impl LoadNotice {
    fn for_origin(origin: &TableOrigin, what: &str) -> Self {
        match origin {
            TableOrigin::Upload(_) => {
                let mut label = what.to_string();
                if let Some(first) = label.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                LoadNotice::Uploaded(format!("{} data loaded successfully!", label))
            }
            TableOrigin::Fallback(path) => LoadNotice::UsingDefault(format!(
                "Using default {} data: {}",
                what,
                path.display()
            )),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            LoadNotice::Uploaded(text) | LoadNotice::UsingDefault(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendTab {
    Ready {
        notice: LoadNotice,
        dashboard: TrendDashboard,
    },
    Failed(TabFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StationTab {
    Ready {
        notice: LoadNotice,
        map: StationMap,
    },
    Failed(TabFailure),
}

fn load_failure(err: LoadError, what: &str) -> TabFailure {
    error!(error = %err, "{} load failed", what);
    let message = if err.is_fallback() {
        format!("Please upload {} data or ensure default file exists.", what)
    } else {
        err.to_string()
    };
    TabFailure {
        kind: FailureKind::Load,
        message,
    }
}

/// Run the measurement pipeline.
pub fn run_trend_tab(inputs: &DashboardInputs, paths: &FallbackPaths) -> TrendTab {
    let table = match DataLoader::load(inputs.results_upload.as_ref(), &paths.results) {
        Ok(table) => table,
        Err(err) => return TrendTab::Failed(load_failure(err, "measurement")),
    };

    match TrendDashboard::build(&table.df, inputs.comparison) {
        Ok(dashboard) => {
            info!(
                comparison = %inputs.comparison,
                panels = dashboard.panels.len(),
                "trend tab ready"
            );
            TrendTab::Ready {
                notice: LoadNotice::for_origin(&table.origin, "measurement"),
                dashboard,
            }
        }
        Err(err) => {
            error!(error = %err, "trend extraction failed");
            TrendTab::Failed(TabFailure {
                kind: FailureKind::Other,
                message: format!("An error occurred: {}", err),
            })
        }
    }
}

/// Run the station pipeline.
pub fn run_station_tab(inputs: &DashboardInputs, paths: &FallbackPaths) -> StationTab {
    let table = match DataLoader::load(inputs.stations_upload.as_ref(), &paths.stations) {
        Ok(table) => table,
        Err(err) => return StationTab::Failed(load_failure(err, "station")),
    };

    match StationExtractor::extract(&table.df) {
        Ok(stations) => {
            info!(stations = stations.len(), "station tab ready");
            StationTab::Ready {
                notice: LoadNotice::for_origin(&table.origin, "station"),
                map: StationMap { stations },
            }
        }
        Err(err @ StationError::MissingColumns(_)) => {
            error!(error = %err, "station schema check failed");
            StationTab::Failed(TabFailure {
                kind: FailureKind::Schema,
                message: err.to_string(),
            })
        }
        Err(err) => {
            error!(error = %err, "station extraction failed");
            StationTab::Failed(TabFailure {
                kind: FailureKind::Other,
                message: format!("An error occurred: {}", err),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_titles_follow_the_trend() {
        let empty = TrendPanel {
            trend: Trend::Empty {
                characteristic: "Nitrate".into(),
            },
        };
        assert_eq!(empty.title(), "No Nitrate data available");
        assert_eq!(empty.y_label(), "");
    }

    #[test]
    fn dashboard_pairs_aluminum_with_the_comparison() {
        let df = DataLoader::read_csv_bytes(
            b"ActivityStartDate,CharacteristicName,ResultMeasureValue,MonitoringLocationIdentifier,ResultMeasure/MeasureUnitCode\n2020-01-01,Aluminum,5,A,ug/L\n",
        )
        .unwrap();
        let dashboard = TrendDashboard::build(&df, Characteristic::Ph).unwrap();

        assert_eq!(dashboard.panels.len(), 2);
        assert_eq!(dashboard.panels[0].title(), "Trend of Aluminum Measurements");
        assert_eq!(dashboard.panels[0].y_label(), "Aluminum (ug/L)");
        assert_eq!(dashboard.panels[1].title(), "No pH data available");
    }

    #[test]
    fn notices_name_the_source() {
        let uploaded = LoadNotice::for_origin(&TableOrigin::Upload("x.csv".into()), "station");
        assert_eq!(uploaded.text(), "Station data loaded successfully!");

        let default = LoadNotice::for_origin(
            &TableOrigin::Fallback(PathBuf::from("station.csv")),
            "station",
        );
        assert_eq!(default.text(), "Using default station data: station.csv");
    }
}

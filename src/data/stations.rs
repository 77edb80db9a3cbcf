//! Station Extraction Module
//! Projects a station table onto its identifying columns and reduces it to one
//! entry per unique located station.

use crate::data::columns::{
    coerce_number, missing_columns, text_cells, LATITUDE_MEASURE, LONGITUDE_MEASURE,
    MONITORING_LOCATION_NAME, MONITORING_LOCATION_TYPE, STATION_COLUMNS,
};
use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StationError {
    #[error("Missing required columns in station data: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// A monitoring location.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub location_type: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Station {
    fn key(&self) -> (String, String, u64, u64) {
        (
            self.name.clone(),
            self.location_type.clone(),
            normalized_bits(self.latitude),
            normalized_bits(self.longitude),
        )
    }
}

/// `-0.0` and `0.0` are the same coordinate.
fn normalized_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Unique located stations, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationSet {
    stations: Vec<Station>,
}

impl StationSet {
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Mean latitude and mean longitude; `None` for an empty set.
    pub fn center(&self) -> Option<GeoPoint> {
        if self.stations.is_empty() {
            return None;
        }
        let n = self.stations.len() as f64;
        let latitude = self.stations.iter().map(|s| s.latitude).sum::<f64>() / n;
        let longitude = self.stations.iter().map(|s| s.longitude).sum::<f64>() / n;
        Some(GeoPoint {
            latitude,
            longitude,
        })
    }
}

impl FromIterator<Station> for StationSet {
    /// Keeps the first of each (name, type, latitude, longitude) tuple.
    fn from_iter<I: IntoIterator<Item = Station>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let stations = iter
            .into_iter()
            .filter(|station| seen.insert(station.key()))
            .collect();
        Self { stations }
    }
}

/// Handles station deduplication.
pub struct StationExtractor;

impl StationExtractor {
    pub fn extract(df: &DataFrame) -> Result<StationSet, StationError> {
        let missing = missing_columns(df, &STATION_COLUMNS);
        if !missing.is_empty() {
            return Err(StationError::MissingColumns(missing));
        }

        let names = text_cells(df, MONITORING_LOCATION_NAME)?;
        let types = text_cells(df, MONITORING_LOCATION_TYPE)?;
        let latitudes = text_cells(df, LATITUDE_MEASURE)?;
        let longitudes = text_cells(df, LONGITUDE_MEASURE)?;

        let set: StationSet = (0..df.height())
            .filter_map(|i| {
                let latitude = coerce_number(latitudes[i].as_deref())?;
                let longitude = coerce_number(longitudes[i].as_deref())?;
                Some(Station {
                    name: names[i].clone().unwrap_or_default(),
                    location_type: types[i].clone().unwrap_or_default(),
                    latitude,
                    longitude,
                })
            })
            .collect();

        debug!(rows = df.height(), unique = set.len(), "extracted stations");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    const HEADER: &str =
        "MonitoringLocationName,MonitoringLocationTypeName,LatitudeMeasure,LongitudeMeasure\n";

    fn table(csv: &str) -> DataFrame {
        DataLoader::read_csv_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn duplicate_rows_collapse_and_center_on_them() {
        let df = table(&format!(
            "{HEADER}Mill Creek,River/Stream,40.5,-89.6\nMill Creek,River/Stream,40.5,-89.6\n"
        ));
        let set = StationExtractor::extract(&df).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(
            set.center(),
            Some(GeoPoint {
                latitude: 40.5,
                longitude: -89.6
            })
        );
    }

    #[test]
    fn numerically_equal_coordinates_are_duplicates() {
        let df = table(&format!(
            "{HEADER}Well 4,Well,40.50,-89.60\nWell 4,Well,40.5,-89.6\n"
        ));
        assert_eq!(StationExtractor::extract(&df).unwrap().len(), 1);
    }

    #[test]
    fn unlocated_rows_are_dropped() {
        let df = table(&format!(
            "{HEADER}A,Lake,41.0,\nB,Lake,,-88.0\nC,Lake,n/a,-88.0\nD,Lake,42.0,-87.0\n"
        ));
        let set = StationExtractor::extract(&df).unwrap();
        let names: Vec<_> = set.stations().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["D"]);
    }

    #[test]
    fn missing_longitude_is_a_schema_error() {
        let df = table(
            "MonitoringLocationName,MonitoringLocationTypeName,LatitudeMeasure\nA,Lake,41.0\n",
        );
        match StationExtractor::extract(&df) {
            Err(StationError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["LongitudeMeasure".to_string()])
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn empty_set_has_no_center() {
        let df = table(&format!("{HEADER}A,Lake,,\n"));
        let set = StationExtractor::extract(&df).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.center(), None);
    }

    #[test]
    fn distinct_types_at_one_place_are_kept() {
        let df = table(&format!(
            "{HEADER}Dock,Lake,41.0,-88.0\nDock,River/Stream,41.0,-88.0\n"
        ));
        assert_eq!(StationExtractor::extract(&df).unwrap().len(), 2);
    }
}

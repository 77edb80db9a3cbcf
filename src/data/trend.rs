//! Trend Extraction Module
//! Filters measurements to one characteristic, coerces values, and pivots them
//! into one mean-aggregated, date-ordered series per monitoring site.

use crate::data::columns::{
    coerce_number, missing_columns, text_cells, ACTIVITY_START_DATE, CHARACTERISTIC_NAME,
    MEASUREMENT_COLUMNS, MONITORING_LOCATION_ID, RESULT_MEASURE_VALUE, RESULT_UNIT_CODE,
};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum TrendError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing required columns in measurement data: {0:?}")]
    MissingColumns(Vec<String>),
}

/// One aggregated observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Per-site series for one characteristic.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSet {
    pub characteristic: String,
    /// Unit of the first surviving row, if it had one.
    pub unit: Option<String>,
    /// Site id -> points strictly ascending by date.
    pub sites: BTreeMap<String, Vec<TrendPoint>>,
}

impl TrendSet {
    pub fn point_count(&self) -> usize {
        self.sites.values().map(Vec::len).sum()
    }

    /// Earliest and latest date across all sites.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.sites.values().filter_map(|s| s.first()).map(|p| p.date).min()?;
        let last = self.sites.values().filter_map(|s| s.last()).map(|p| p.date).max()?;
        Some((first, last))
    }

    /// Smallest and largest aggregated value across all sites.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.sites
            .values()
            .flatten()
            .map(|p| p.value)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Result of a trend extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Trend {
    Data(TrendSet),
    /// Nothing matched the characteristic after value coercion.
    Empty { characteristic: String },
}

impl Trend {
    pub fn characteristic(&self) -> &str {
        match self {
            Trend::Data(set) => &set.characteristic,
            Trend::Empty { characteristic } => characteristic,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Trend::Empty { .. })
    }
}

/// Parse an activity date. Accepts ISO, slash-separated and US forms, with an
/// optional time part that is discarded.
pub fn parse_activity_date(text: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    const DATETIME_FORMATS: [&str; 6] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];

    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Handles the measurement pivot.
pub struct TrendExtractor;

impl TrendExtractor {
    /// Build one series per site for every row whose characteristic name
    /// contains `characteristic` (case-insensitive).
    pub fn extract(df: &DataFrame, characteristic: &str) -> Result<Trend, TrendError> {
        let missing = missing_columns(df, &MEASUREMENT_COLUMNS);
        if !missing.is_empty() {
            return Err(TrendError::MissingColumns(missing));
        }

        let names = text_cells(df, CHARACTERISTIC_NAME)?;
        let values = text_cells(df, RESULT_MEASURE_VALUE)?;
        let dates = text_cells(df, ACTIVITY_START_DATE)?;
        let sites = text_cells(df, MONITORING_LOCATION_ID)?;
        let units = if df.get_column_names().iter().any(|c| c.as_str() == RESULT_UNIT_CODE) {
            Some(text_cells(df, RESULT_UNIT_CODE)?)
        } else {
            None
        };

        let needle = characteristic.to_lowercase();

        // (site, date) -> (sum, count)
        let mut buckets: BTreeMap<String, BTreeMap<NaiveDate, (f64, usize)>> = BTreeMap::new();
        let mut surviving = 0usize;
        let mut undated = 0usize;
        let mut unit: Option<String> = None;
        let mut seen_units: BTreeSet<String> = BTreeSet::new();

        for i in 0..df.height() {
            let matches = names[i]
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle));
            if !matches {
                continue;
            }

            let Some(value) = coerce_number(values[i].as_deref()) else {
                continue;
            };

            let row_unit = units
                .as_ref()
                .and_then(|u| u[i].as_deref())
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string);
            if surviving == 0 {
                unit = row_unit.clone();
            }
            if let Some(u) = row_unit {
                seen_units.insert(u);
            }
            surviving += 1;

            let Some(date) = dates[i].as_deref().and_then(parse_activity_date) else {
                undated += 1;
                continue;
            };
            let Some(site) = sites[i].clone().filter(|s| !s.is_empty()) else {
                continue;
            };

            let slot = buckets.entry(site).or_default().entry(date).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }

        if surviving == 0 {
            debug!(characteristic, "no numeric rows matched");
            return Ok(Trend::Empty {
                characteristic: characteristic.to_string(),
            });
        }

        if undated > 0 {
            warn!(characteristic, rows = undated, "dropped rows with unparseable activity dates");
        }
        if seen_units.len() > 1 {
            warn!(
                characteristic,
                units = ?seen_units,
                chosen = ?unit,
                "inconsistent units; using the first row's unit"
            );
        }

        let mut overflowed = 0usize;
        let sites: BTreeMap<String, Vec<TrendPoint>> = buckets
            .into_iter()
            .filter_map(|(site, by_date)| {
                let points: Vec<TrendPoint> = by_date
                    .into_iter()
                    .map(|(date, (sum, count))| TrendPoint {
                        date,
                        value: sum / count as f64,
                    })
                    .filter(|p| {
                        let finite = p.value.is_finite();
                        if !finite {
                            overflowed += 1;
                        }
                        finite
                    })
                    .collect();
                (!points.is_empty()).then_some((site, points))
            })
            .collect();
        if overflowed > 0 {
            warn!(characteristic, points = overflowed, "dropped daily means that overflowed");
        }

        debug!(
            characteristic,
            rows = surviving,
            sites = sites.len(),
            "extracted trend"
        );

        Ok(Trend::Data(TrendSet {
            characteristic: characteristic.to_string(),
            unit,
            sites,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    fn table(csv: &str) -> DataFrame {
        DataLoader::read_csv_bytes(csv.as_bytes()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const HEADER: &str = "ActivityStartDate,CharacteristicName,ResultMeasureValue,MonitoringLocationIdentifier,ResultMeasure/MeasureUnitCode\n";

    #[test]
    fn averages_same_day_readings_and_skips_junk() {
        let df = table(&format!(
            "{HEADER}2020-01-01,Aluminum,5,A,ug/L\n2020-01-01,Aluminum,7,A,ug/L\n2020-01-02,Total Aluminum,bad,B,ug/L\n"
        ));

        let Trend::Data(set) = TrendExtractor::extract(&df, "Aluminum").unwrap() else {
            panic!("expected data");
        };

        assert_eq!(set.unit.as_deref(), Some("ug/L"));
        assert_eq!(set.sites.len(), 1);
        assert_eq!(
            set.sites["A"],
            vec![TrendPoint {
                date: date(2020, 1, 1),
                value: 6.0
            }]
        );
    }

    #[test]
    fn absent_characteristic_is_empty() {
        let df = table(&format!("{HEADER}2020-01-01,Aluminum,5,A,ug/L\n"));
        let trend = TrendExtractor::extract(&df, "Radon").unwrap();
        assert_eq!(
            trend,
            Trend::Empty {
                characteristic: "Radon".into()
            }
        );
    }

    #[test]
    fn substring_match_ignores_case() {
        let df = table(&format!(
            "{HEADER}2020-01-01,\"Total aluminum, Dissolved\",2,A,mg/L\n2020-01-02,ALUMINUM,4,A,mg/L\n"
        ));
        let Trend::Data(set) = TrendExtractor::extract(&df, "Aluminum").unwrap() else {
            panic!("expected data");
        };
        assert_eq!(set.point_count(), 2);
    }

    #[test]
    fn series_are_sorted_with_gaps_left_out() {
        let df = table(&format!(
            "{HEADER}2020-03-01,pH,7.5,A,\n2020-01-01,pH,7.0,A,\n2020-02-01,pH,x,A,\n"
        ));
        let Trend::Data(set) = TrendExtractor::extract(&df, "pH").unwrap() else {
            panic!("expected data");
        };
        let dates: Vec<_> = set.sites["A"].iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2020, 1, 1), date(2020, 3, 1)]);
        assert_eq!(set.unit, None);
    }

    #[test]
    fn first_surviving_unit_wins() {
        let df = table(&format!(
            "{HEADER}2020-01-01,Nitrate,oops,A,ppm\n2020-01-01,Nitrate,1,A,mg/L\n2020-01-02,Nitrate,2,B,ug/L\n"
        ));
        let Trend::Data(set) = TrendExtractor::extract(&df, "Nitrate").unwrap() else {
            panic!("expected data");
        };
        assert_eq!(set.unit.as_deref(), Some("mg/L"));
    }

    #[test]
    fn overflowing_daily_mean_is_dropped() {
        let df = table(&format!(
            "{HEADER}2020-01-01,Aluminum,1e308,A,ug/L\n2020-01-01,Aluminum,1e308,A,ug/L\n2020-01-02,Aluminum,3,A,ug/L\n2020-01-01,Aluminum,1e308,B,ug/L\n2020-01-01,Aluminum,1e308,B,ug/L\n"
        ));
        let Trend::Data(set) = TrendExtractor::extract(&df, "Aluminum").unwrap() else {
            panic!("expected data");
        };
        assert_eq!(set.sites.keys().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(
            set.sites["A"],
            vec![TrendPoint {
                date: date(2020, 1, 2),
                value: 3.0
            }]
        );
    }

    #[test]
    fn blank_first_unit_leaves_the_set_unitless() {
        let df = table(&format!(
            "{HEADER}2020-01-01,Chloride,3,A,\"  \"\n2020-01-02,Chloride,4,A, mg/L \n"
        ));
        let Trend::Data(set) = TrendExtractor::extract(&df, "Chloride").unwrap() else {
            panic!("expected data");
        };
        assert_eq!(set.unit, None);
    }

    #[test]
    fn unit_column_is_optional() {
        let df = table(
            "ActivityStartDate,CharacteristicName,ResultMeasureValue,MonitoringLocationIdentifier\n2020-01-01,Chloride,3,A\n",
        );
        let Trend::Data(set) = TrendExtractor::extract(&df, "Chloride").unwrap() else {
            panic!("expected data");
        };
        assert_eq!(set.unit, None);
        assert_eq!(set.sites["A"][0].value, 3.0);
    }

    #[test]
    fn undated_rows_are_dropped_not_fatal() {
        let df = table(&format!(
            "{HEADER}someday,Chloride,3,A,mg/L\n2021-05-06,Chloride,4,A,mg/L\n"
        ));
        let Trend::Data(set) = TrendExtractor::extract(&df, "Chloride").unwrap() else {
            panic!("expected data");
        };
        assert_eq!(set.sites["A"].len(), 1);
        assert_eq!(set.sites["A"][0].date, date(2021, 5, 6));
    }

    #[test]
    fn missing_measurement_columns_are_reported() {
        let df = table("CharacteristicName,ResultMeasureValue\nAluminum,1\n");
        match TrendExtractor::extract(&df, "Aluminum") {
            Err(TrendError::MissingColumns(cols)) => assert_eq!(
                cols,
                vec![
                    "ActivityStartDate".to_string(),
                    "MonitoringLocationIdentifier".to_string()
                ]
            ),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn parses_common_date_forms() {
        assert_eq!(parse_activity_date("2020-01-02"), Some(date(2020, 1, 2)));
        assert_eq!(parse_activity_date("2020/01/02"), Some(date(2020, 1, 2)));
        assert_eq!(parse_activity_date("01/02/2020"), Some(date(2020, 1, 2)));
        assert_eq!(
            parse_activity_date("2020-01-02T13:45:00"),
            Some(date(2020, 1, 2))
        );
        assert_eq!(parse_activity_date("2020-13-40"), None);
        assert_eq!(parse_activity_date(""), None);
    }
}

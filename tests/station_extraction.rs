// Behavioural tests for station deduplication through the public API

use std::collections::HashSet;
use water_quality::data::{DataLoader, GeoPoint, StationError, StationExtractor};

const HEADER: &str =
    "MonitoringLocationName,MonitoringLocationTypeName,LatitudeMeasure,LongitudeMeasure,OrganizationIdentifier\n";

#[test]
fn no_two_entries_share_all_four_fields() {
    let csv = format!(
        "{HEADER}\
Peoria Lake,Lake,40.70,-89.55,ORG1
Peoria Lake,Lake,40.70,-89.55,ORG2
Peoria Lake,Lake,40.70,-89.56,ORG1
Kickapoo Creek,River/Stream,40.61,-89.70,ORG1
Kickapoo Creek,River/Stream,,-89.70,ORG1
Kickapoo Creek,River/Stream,40.61,-89.70,ORG3
"
    );
    let df = DataLoader::read_csv_bytes(csv.as_bytes()).unwrap();
    let set = StationExtractor::extract(&df).unwrap();

    assert_eq!(set.len(), 3);
    let keys: HashSet<_> = set
        .stations()
        .iter()
        .map(|s| {
            (
                s.name.clone(),
                s.location_type.clone(),
                s.latitude.to_bits(),
                s.longitude.to_bits(),
            )
        })
        .collect();
    assert_eq!(keys.len(), set.len());
    assert!(set
        .stations()
        .iter()
        .all(|s| s.latitude.is_finite() && s.longitude.is_finite()));
}

#[test]
fn first_occurrence_order_is_kept() {
    let csv = format!("{HEADER}B,Lake,1,1,X\nA,Lake,2,2,X\nB,Lake,1,1,Y\n");
    let df = DataLoader::read_csv_bytes(csv.as_bytes()).unwrap();
    let set = StationExtractor::extract(&df).unwrap();
    let names: Vec<_> = set.stations().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn identical_rows_center_on_the_single_station() {
    let csv = format!("{HEADER}Dock,Lake,41.25,-87.5,X\nDock,Lake,41.25,-87.5,X\n");
    let df = DataLoader::read_csv_bytes(csv.as_bytes()).unwrap();
    let set = StationExtractor::extract(&df).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(
        set.center(),
        Some(GeoPoint {
            latitude: 41.25,
            longitude: -87.5
        })
    );
}

#[test]
fn any_missing_required_column_is_a_schema_error() {
    let cases = [
        ("MonitoringLocationTypeName,LatitudeMeasure,LongitudeMeasure\nLake,1,2\n", vec!["MonitoringLocationName"]),
        ("MonitoringLocationName,MonitoringLocationTypeName,LatitudeMeasure\nA,Lake,1\n", vec!["LongitudeMeasure"]),
        ("Other\nx\n", vec![
            "MonitoringLocationName",
            "MonitoringLocationTypeName",
            "LatitudeMeasure",
            "LongitudeMeasure",
        ]),
    ];

    for (csv, expected) in cases {
        let df = DataLoader::read_csv_bytes(csv.as_bytes()).unwrap();
        match StationExtractor::extract(&df) {
            Err(StationError::MissingColumns(missing)) => assert_eq!(missing, expected),
            other => panic!("expected a schema error for {csv:?}, got {other:?}"),
        }
    }
}

#[test]
fn names_differing_only_in_whitespace_stay_distinct() {
    let csv = format!("{HEADER}\" Dock\",Lake,41,-88,X\nDock,Lake,41,-88,X\n\"Dock \",Lake,41,-88,X\n");
    let df = DataLoader::read_csv_bytes(csv.as_bytes()).unwrap();
    let set = StationExtractor::extract(&df).unwrap();
    let names: Vec<_> = set.stations().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![" Dock", "Dock", "Dock "]);
}

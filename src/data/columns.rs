//! Source column names and text access helpers.

use polars::prelude::*;

pub const ACTIVITY_START_DATE: &str = "ActivityStartDate";
pub const CHARACTERISTIC_NAME: &str = "CharacteristicName";
pub const RESULT_MEASURE_VALUE: &str = "ResultMeasureValue";
pub const MONITORING_LOCATION_ID: &str = "MonitoringLocationIdentifier";
pub const RESULT_UNIT_CODE: &str = "ResultMeasure/MeasureUnitCode";

pub const MONITORING_LOCATION_NAME: &str = "MonitoringLocationName";
pub const MONITORING_LOCATION_TYPE: &str = "MonitoringLocationTypeName";
pub const LATITUDE_MEASURE: &str = "LatitudeMeasure";
pub const LONGITUDE_MEASURE: &str = "LongitudeMeasure";

/// Columns the trend transformer cannot work without.
pub const MEASUREMENT_COLUMNS: [&str; 4] = [
    ACTIVITY_START_DATE,
    CHARACTERISTIC_NAME,
    RESULT_MEASURE_VALUE,
    MONITORING_LOCATION_ID,
];

/// Columns the station transformer projects onto, in report order.
pub const STATION_COLUMNS: [&str; 4] = [
    MONITORING_LOCATION_NAME,
    MONITORING_LOCATION_TYPE,
    LATITUDE_MEASURE,
    LONGITUDE_MEASURE,
];

/// Names from `required` that `df` does not have, in the order given.
pub fn missing_columns(df: &DataFrame, required: &[&str]) -> Vec<String> {
    let present = df.get_column_names();
    required
        .iter()
        .copied()
        .filter(|name| !present.iter().any(|p| p.as_str() == *name))
        .map(|name| name.to_string())
        .collect()
}

/// Read a column as text cells, exactly as stored. Non-text columns are cast
/// first, so tables built in code behave like tables read from CSV.
pub fn text_cells(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::to_string))
        .collect())
}

/// Coerce a cell to a plottable number: blank, junk, NaN and infinities all
/// become `None`.
pub fn coerce_number(cell: Option<&str>) -> Option<f64> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

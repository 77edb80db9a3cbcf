//! Data module - CSV loading and the trend/station transformers

mod characteristic;
pub mod columns;
mod loader;
mod stations;
mod trend;

pub use characteristic::{Characteristic, UnknownCharacteristic};
pub use loader::{column_names, DataLoader, LoadError, LoadedTable, TableOrigin, Upload};
pub use stations::{GeoPoint, Station, StationError, StationExtractor, StationSet};
pub use trend::{parse_activity_date, Trend, TrendError, TrendExtractor, TrendPoint, TrendSet};

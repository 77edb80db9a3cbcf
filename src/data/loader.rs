//! CSV Data Loader Module
//! Reads a table from an uploaded file or from a fallback default path using Polars.

use polars::prelude::*;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not parse uploaded file {name}: {source}")]
    Upload {
        name: String,
        #[source]
        source: PolarsError,
    },
    #[error("Could not read default file {}: {source}", path.display())]
    Fallback {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

impl LoadError {
    /// True when no upload was given and the default file was unusable.
    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadError::Fallback { .. })
    }
}

/// A file supplied by the user, held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a picked file into memory.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Where a loaded table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOrigin {
    Upload(String),
    Fallback(PathBuf),
}

/// A parsed table and its origin.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub df: DataFrame,
    pub origin: TableOrigin,
}

/// Stateless CSV loading. Every column is read as text; coercion happens
/// in the transformers.
pub struct DataLoader;

impl DataLoader {
    /// Load the upload if one is given, otherwise the fallback path.
    ///
    /// A broken upload is fatal for the pipeline; it never falls through to
    /// the default file.
    pub fn load(upload: Option<&Upload>, fallback: &Path) -> Result<LoadedTable, LoadError> {
        match upload {
            Some(upload) => {
                let df = Self::read_csv_bytes(&upload.bytes).map_err(|source| {
                    LoadError::Upload {
                        name: upload.name.clone(),
                        source,
                    }
                })?;
                info!(file = %upload.name, rows = df.height(), "loaded uploaded table");
                Ok(LoadedTable {
                    df,
                    origin: TableOrigin::Upload(upload.name.clone()),
                })
            }
            None => {
                let df = Self::read_csv_path(fallback).map_err(|source| LoadError::Fallback {
                    path: fallback.to_path_buf(),
                    source,
                })?;
                info!(path = %fallback.display(), rows = df.height(), "loaded default table");
                Ok(LoadedTable {
                    df,
                    origin: TableOrigin::Fallback(fallback.to_path_buf()),
                })
            }
        }
    }

    /// Parse CSV text held in memory.
    pub fn read_csv_bytes(bytes: &[u8]) -> PolarsResult<DataFrame> {
        debug!(len = bytes.len(), "parsing CSV from memory");
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
    }

    /// Parse a CSV file on disk.
    pub fn read_csv_path(path: &Path) -> PolarsResult<DataFrame> {
        if !path.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
            .into());
        }

        debug!(path = %path.display(), "parsing CSV from disk");
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()
    }
}

/// Column names of a table, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_wins_over_fallback() {
        let upload = Upload::new("mine.csv", b"a,b\n1,2\n".to_vec());
        let table = DataLoader::load(Some(&upload), Path::new("/nonexistent/default.csv"))
            .unwrap();

        assert_eq!(table.origin, TableOrigin::Upload("mine.csv".into()));
        assert_eq!(column_names(&table.df), vec!["a", "b"]);
        assert_eq!(table.df.height(), 1);
    }

    #[test]
    fn missing_fallback_is_a_load_error() {
        let err = DataLoader::load(None, Path::new("/nonexistent/default.csv")).unwrap_err();
        assert!(err.is_fallback());
    }

    #[test]
    fn every_column_is_text() {
        let df = DataLoader::read_csv_bytes(b"v,w\n1.5,x\nbad,y\n").unwrap();
        for column in df.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }
    }
}

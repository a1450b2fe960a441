//! Persisted forecast tables.
//!
//! The batch job writes one CSV table per metric and always overwrites it.
//! [`ForecastStore`] reads a table back and answers single (entity, metric)
//! lookups. A missing table or a missing forecast is an ordinary
//! [`ForecastLookup::Unavailable`] answer, not an error.

use crate::error::Result;
use crate::record::ForecastRecord;
use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// `<dir>/forecasts_<metric>.csv`
pub fn table_path(dir: &Path, metric: &str) -> PathBuf {
    dir.join(format!("forecasts_{}.csv", metric))
}

/// Write a table, replacing any previous file
pub fn write_records(path: &Path, records: &[ForecastRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Why no forecast could be served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unavailable {
    /// The table file does not exist
    NoTable,
    /// The table has no forecast rows for the entity and metric
    NoForecast,
}

/// Result of a store lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastLookup {
    /// History and forecast rows, ascending by year
    Available(Vec<ForecastRecord>),
    Unavailable(Unavailable),
}

impl ForecastLookup {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn records(&self) -> &[ForecastRecord] {
        match self {
            Self::Available(records) => records,
            Self::Unavailable(_) => &[],
        }
    }
}

/// Read-only view over one persisted table
#[derive(Debug, Clone)]
pub struct ForecastStore {
    path: PathBuf,
    records: Option<Vec<ForecastRecord>>,
}

impl ForecastStore {
    /// Load a table; a missing file yields an empty store.
    ///
    /// Malformed files are errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "forecast table not found");
                return Ok(Self { path, records: None });
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::Reader::from_reader(file);
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<ForecastRecord>, csv::Error>>()?;

        Ok(Self {
            path,
            records: Some(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the table file existed
    pub fn has_table(&self) -> bool {
        self.records.is_some()
    }

    pub fn len(&self) -> usize {
        self.records.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entities with at least one row, sorted
    pub fn entities(&self) -> Vec<&str> {
        let mut entities: Vec<&str> = self
            .records
            .iter()
            .flatten()
            .map(|r| r.entity.as_str())
            .collect();
        entities.sort_unstable();
        entities.dedup();
        entities
    }

    pub fn lookup(&self, entity: &str, metric: &str) -> ForecastLookup {
        let Some(records) = &self.records else {
            return ForecastLookup::Unavailable(Unavailable::NoTable);
        };

        let mut rows: Vec<ForecastRecord> = records
            .iter()
            .filter(|r| r.entity == entity && r.metric == metric)
            .cloned()
            .collect();

        if !rows.iter().any(ForecastRecord::is_forecast) {
            return ForecastLookup::Unavailable(Unavailable::NoForecast);
        }

        rows.sort_by_key(|r| r.year);
        ForecastLookup::Available(rows)
    }
}

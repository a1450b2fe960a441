//! Panel source configuration types.

use data_core::{CsvPanelSource, CODE_COLUMN, ENTITY_COLUMN, YEAR_COLUMN};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for loading a country-year panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// CSV file to read
    pub path: PathBuf,
    /// Entity name column
    pub entity_column: String,
    /// Entity code column
    pub code_column: String,
    /// Year column
    pub year_column: String,
    /// Metric columns to keep; all non-key columns when empty
    pub metrics: Vec<String>,
    /// Inclusive year range
    pub years: Option<(i32, i32)>,
    /// Drop rows with an empty code
    pub drop_uncoded: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("owid-co2-data.csv"),
            entity_column: ENTITY_COLUMN.to_string(),
            code_column: CODE_COLUMN.to_string(),
            year_column: YEAR_COLUMN.to_string(),
            metrics: Vec::new(),
            years: None,
            drop_uncoded: true,
        }
    }
}

impl PanelConfig {
    /// Create a configuration for a file with default columns.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn builder() -> PanelConfigBuilder {
        PanelConfigBuilder::new()
    }

    /// Source configured from this config
    pub fn source(&self) -> CsvPanelSource {
        let mut source = CsvPanelSource::new(&self.path).with_columns(
            &self.entity_column,
            &self.code_column,
            &self.year_column,
        );
        if !self.metrics.is_empty() {
            source = source.with_metrics(self.metrics.clone());
        }
        if let Some((min, max)) = self.years {
            source = source.with_year_range(min, max);
        }
        if !self.drop_uncoded {
            source = source.keep_uncoded();
        }
        source
    }
}

/// Builder for PanelConfig.
#[derive(Debug, Default)]
pub struct PanelConfigBuilder {
    path: Option<PathBuf>,
    metrics: Vec<String>,
    years: Option<(i32, i32)>,
    drop_uncoded: Option<bool>,
}

impl PanelConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSV path.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a metric column.
    pub fn metric(mut self, metric: &str) -> Self {
        self.metrics.push(metric.to_string());
        self
    }

    /// Restrict to an inclusive year range.
    pub fn years(mut self, min: i32, max: i32) -> Self {
        self.years = Some((min, max));
        self
    }

    /// Keep or drop rows with an empty code.
    pub fn drop_uncoded(mut self, drop: bool) -> Self {
        self.drop_uncoded = Some(drop);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<PanelConfig, &'static str> {
        if let Some((min, max)) = self.years {
            if min > max {
                return Err("year range is empty");
            }
        }
        Ok(PanelConfig {
            path: self.path.ok_or("path is required")?,
            metrics: self.metrics,
            years: self.years,
            drop_uncoded: self.drop_uncoded.unwrap_or(true),
            ..PanelConfig::default()
        })
    }
}

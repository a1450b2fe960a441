//! Batch configuration.

use crate::error::Result;
use forecast_facade::{ArimaOrder, ForecastConfig, ForecastError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Minimum non-missing values an entity needs to be forecast
pub const DEFAULT_MIN_POINTS: usize = 6;

/// Configuration for a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Metrics to forecast; every panel metric when empty
    pub metrics: Vec<String>,
    /// Per-series forecast settings
    pub forecast: ForecastConfig,
    /// Entities with fewer non-missing values are skipped
    pub min_points: usize,
    /// Directory receiving tables and charts
    pub output_dir: PathBuf,
    /// Render one HTML chart per entity
    pub write_plots: bool,
    /// Forecast entities on the rayon pool
    pub parallel: bool,
    /// Also forecast the per-year sum across entities
    pub include_global: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            metrics: vec!["co2".to_string()],
            forecast: ForecastConfig::default(),
            min_points: DEFAULT_MIN_POINTS,
            output_dir: PathBuf::from("data"),
            write_plots: true,
            parallel: true,
            include_global: true,
        }
    }
}

impl BatchConfig {
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_points == 0 {
            return Err(ForecastError::invalid("min_points", "must be at least 1").into());
        }
        self.forecast.validate()?;
        Ok(())
    }

    /// Directory holding the charts of one metric
    pub fn plots_dir(&self, metric: &str) -> PathBuf {
        self.output_dir.join("forecasts_plots").join(metric)
    }
}

/// Builder for BatchConfig.
#[derive(Debug, Default)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
    metrics: Vec<String>,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a metric; replaces the default metric list.
    pub fn metric(mut self, metric: &str) -> Self {
        self.metrics.push(metric.to_string());
        self
    }

    pub fn steps(mut self, steps: usize) -> Self {
        self.config.forecast.steps = steps;
        self
    }

    pub fn order(mut self, order: ArimaOrder) -> Self {
        self.config.forecast.order = order;
        self
    }

    pub fn min_points(mut self, min_points: usize) -> Self {
        self.config.min_points = min_points;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn write_plots(mut self, enabled: bool) -> Self {
        self.config.write_plots = enabled;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    pub fn include_global(mut self, enabled: bool) -> Self {
        self.config.include_global = enabled;
        self
    }

    /// Build and validate the configuration.
    pub fn build(mut self) -> Result<BatchConfig> {
        if !self.metrics.is_empty() {
            self.config.metrics = self.metrics;
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BatchError;

    #[test]
    fn test_defaults() {
        let config = BatchConfig::default();
        assert_eq!(config.metrics, vec!["co2"]);
        assert_eq!(config.forecast.steps, 5);
        assert_eq!(config.forecast.order, ArimaOrder::new(1, 1, 1));
        assert_eq!(config.min_points, 6);
        assert!(config.write_plots && config.parallel && config.include_global);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BatchConfig::builder()
            .metric("gdp")
            .metric("population")
            .steps(10)
            .min_points(8)
            .output_dir("/tmp/out")
            .write_plots(false)
            .parallel(false)
            .build()
            .unwrap();

        assert_eq!(config.metrics, vec!["gdp", "population"]);
        assert_eq!(config.forecast.steps, 10);
        assert_eq!(config.min_points, 8);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(!config.write_plots);
        assert!(!config.parallel);
    }

    #[test]
    fn test_rejects_zero_min_points() {
        let err = BatchConfig::builder().min_points(0).build().unwrap_err();
        assert!(matches!(
            err,
            BatchError::Forecast(ForecastError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_steps() {
        assert!(BatchConfig::builder().steps(0).build().is_err());
    }

    #[test]
    fn test_plots_dir() {
        let config = BatchConfig::builder().output_dir("out").build().unwrap();
        assert_eq!(
            config.plots_dir("co2"),
            PathBuf::from("out").join("forecasts_plots").join("co2")
        );
    }
}

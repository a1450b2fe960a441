//! Forecast Consumer API
//!
//! Consumer configuration and builder APIs for the forecast engine.
//!
//! This crate provides:
//! - [`ForecastConfig`] and its builder
//! - Re-exports from SPI and core for convenience

// Re-export from core
pub use forecast_core::{
    arima, confidence, engine, fallback, forecast, optimize, table, Arima, ForecastEngine,
    NelderMeadConfig, PersistenceFallback,
};

// Re-export types from SPI
pub use forecast_spi::{
    ArimaOrder, ConfidenceInterval, FallbackPolicy, FitError, FitOutcome, FitResult,
    ForecastError, ForecastMethod, ForecastRow, ForecastTable, Result, SeriesModel, YearSeries,
};

use serde::{Deserialize, Serialize};

/// Default forecast horizon in years
pub const DEFAULT_STEPS: usize = 5;

/// Default two-sided confidence level
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Configuration for a forecast run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of years to forecast
    pub steps: usize,
    /// ARIMA order
    pub order: ArimaOrder,
    /// Confidence level of the interval (e.g., 0.95 for 95%)
    pub confidence_level: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            order: ArimaOrder::default(),
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl ForecastConfig {
    pub fn builder() -> ForecastConfigBuilder {
        ForecastConfigBuilder::new()
    }

    /// Check all parameters
    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(ForecastError::invalid("steps", "must be at least 1"));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::invalid(
                "confidence_level",
                "must be strictly between 0 and 1",
            ));
        }
        self.order.validate()
    }

    /// Engine configured from this config
    pub fn engine(&self) -> Result<ForecastEngine> {
        self.validate()?;
        Ok(ForecastEngine::new(self.order, self.steps)
            .with_confidence_level(self.confidence_level))
    }
}

/// Builder for ForecastConfig.
#[derive(Debug, Default)]
pub struct ForecastConfigBuilder {
    steps: Option<usize>,
    order: Option<ArimaOrder>,
    confidence_level: Option<f64>,
}

impl ForecastConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizon.
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Set the ARIMA order.
    pub fn order(mut self, order: ArimaOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the confidence level.
    pub fn confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = Some(confidence_level);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ForecastConfig> {
        let defaults = ForecastConfig::default();
        let config = ForecastConfig {
            steps: self.steps.unwrap_or(defaults.steps),
            order: self.order.unwrap_or(defaults.order),
            confidence_level: self.confidence_level.unwrap_or(defaults.confidence_level),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ForecastConfig, ForecastConfigBuilder, DEFAULT_STEPS};
    pub use forecast_core::{forecast, Arima, ForecastEngine, PersistenceFallback};
    pub use forecast_spi::{
        ArimaOrder, ConfidenceInterval, FitOutcome, ForecastError, ForecastMethod, ForecastRow,
        ForecastTable, Result, SeriesModel,
    };
}

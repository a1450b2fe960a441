//! Forecast Core
//!
//! Core implementations for the forecasting stack: the ARIMA model and its
//! optimiser, interval construction, the persistence fallback, and the engine
//! that ties fitting, degradation and table assembly together.

pub mod arima;
pub mod confidence;
pub mod engine;
pub mod fallback;
pub mod optimize;
pub mod table;

// Re-export SPI types for implementations
pub use forecast_spi::{
    ArimaOrder, ConfidenceInterval, FallbackPolicy, FitError, FitOutcome, FitResult,
    ForecastError, ForecastMethod, ForecastRow, ForecastTable, Result, SeriesModel, YearSeries,
};

// Re-export main types
pub use arima::Arima;
pub use engine::{forecast, ForecastEngine};
pub use fallback::PersistenceFallback;
pub use optimize::{nelder_mead, NelderMeadConfig, NelderMeadResult};

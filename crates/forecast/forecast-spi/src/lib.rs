//! Forecast Service Provider Interface
//!
//! Defines the error taxonomy, the data model shared by the forecasting stack,
//! and the contracts implemented by models and fallback policies.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{FallbackPolicy, SeriesModel};
pub use error::{FitError, FitResult, ForecastError, Result};
pub use model::{
    ArimaOrder, ConfidenceInterval, FitOutcome, ForecastMethod, ForecastRow, ForecastTable,
    YearSeries, PERSISTENCE,
};

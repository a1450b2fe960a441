//! Forecast Facade
//!
//! High-level API for yearly series forecasting. Re-exports all public types
//! from the forecast stack for convenient usage.
//!
//! ```rust
//! use forecast_facade::{forecast, ArimaOrder};
//!
//! let years: Vec<i32> = (2000..=2010).collect();
//! let values: Vec<Option<f64>> = (10..=20).map(|v| Some(v as f64)).collect();
//! let table = forecast(&years, &values, 3, ArimaOrder::default()).unwrap();
//! assert_eq!(table.forecast_years(), vec![2011, 2012, 2013]);
//! ```

// Re-export everything from API (which includes SPI and core)
pub use forecast_api::*;

// Explicit re-exports for documentation
pub use forecast_api::prelude;

// Re-export core modules for direct access
pub use forecast_core::{arima, confidence, engine, fallback, optimize, table};

// Re-export SPI contracts
pub use forecast_spi::{FallbackPolicy, SeriesModel};

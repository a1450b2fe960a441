//! Data Source Service Provider Interface
//!
//! Defines the country-year panel model and the trait for sources that load it.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::PanelSource;
pub use error::{DataError, Result};
pub use model::{MetricSeries, Panel, PanelRow, GLOBAL_CODE, GLOBAL_ENTITY};

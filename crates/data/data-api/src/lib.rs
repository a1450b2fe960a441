//! Data Consumer API
//!
//! Configuration types and builders for panel sources.

mod config;

pub use config::{PanelConfig, PanelConfigBuilder};

// Re-export types from SPI
pub use data_spi::{DataError, MetricSeries, Panel, PanelSource, Result};

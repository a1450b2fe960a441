//! Data Source Facade
//!
//! Unified re-exports for the data module.
//!
//! This facade provides a single entry point for all data source functionality:
//! - `data_spi` - Panel model, source trait and errors
//! - `data_api` - Configuration types and builders
//! - `data_core` - Implementations (CSV)
//!
//! # Example
//!
//! ```rust,ignore
//! use data_facade::{PanelConfig, PanelSource};
//!
//! let panel = PanelConfig::new("owid-co2-data.csv").source().load()?;
//! let france = panel.series("France", "co2")?;
//! println!("{} years of data", france.present_count());
//! ```

// Re-export everything from SPI
pub use data_spi::*;

// Re-export everything from API
pub use data_api::*;

// Re-export everything from Core
pub use data_core::*;

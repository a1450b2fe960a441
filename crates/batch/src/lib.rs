//! Batch forecasting over a country-year panel.
//!
//! [`BatchGenerator`] forecasts every entity of every configured metric, writes
//! one `forecasts_<metric>.csv` table per metric and optionally one Plotly chart
//! per entity. [`ForecastStore`] reads those tables back for single lookups.

pub mod chart;
pub mod config;
pub mod error;
pub mod generator;
pub mod record;
pub mod store;

pub use chart::{render_chart, safe_filename, write_chart};
pub use config::{BatchConfig, BatchConfigBuilder, DEFAULT_MIN_POINTS};
pub use error::{BatchError, Result};
pub use generator::{BatchGenerator, BatchReport, EntityForecast, MetricReport, SkipReason, SkippedEntity};
pub use record::ForecastRecord;
pub use store::{table_path, write_records, ForecastLookup, ForecastStore, Unavailable};

//! Data models for country-year panels.

mod panel;

pub use panel::{MetricSeries, Panel, PanelRow, GLOBAL_CODE, GLOBAL_ENTITY};

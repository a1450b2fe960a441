//! Contract module containing trait definitions for panel sources

mod panel_source;

pub use panel_source::PanelSource;

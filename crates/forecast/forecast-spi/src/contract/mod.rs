//! Contract module containing trait definitions for forecast operations

mod fallback_policy;
mod series_model;

pub use fallback_policy::FallbackPolicy;
pub use series_model::SeriesModel;

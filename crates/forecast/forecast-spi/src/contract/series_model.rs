//! Trait for fittable forecasting models

use crate::error::FitResult;
use crate::model::ConfidenceInterval;

/// A model that can be fitted to a gap-free series and project it forward
/// with an interval.
pub trait SeriesModel: Send {
    /// Human readable model name, e.g. `ARIMA(1,1,1)`
    fn name(&self) -> String;

    /// Fit the model to consecutive observations
    fn fit(&mut self, data: &[f64]) -> FitResult<()>;

    /// Forecast `steps` periods with a two-sided interval at `confidence_level`
    fn forecast_interval(&self, steps: usize, confidence_level: f64)
        -> FitResult<ConfidenceInterval>;
}

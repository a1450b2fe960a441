//! Trait for degraded forecasts

use crate::model::ConfidenceInterval;

/// Projection used when model fitting fails
pub trait FallbackPolicy: Send + Sync {
    /// Policy name
    fn name(&self) -> &str;

    /// Project `steps` periods from a non-empty history
    fn project(&self, history: &[f64], steps: usize, confidence_level: f64) -> ConfidenceInterval;
}

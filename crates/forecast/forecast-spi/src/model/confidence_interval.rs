//! Confidence interval model

use serde::{Deserialize, Serialize};

/// Point forecasts with their interval bounds, one entry per horizon step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub forecast: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Two-sided level, e.g. `0.95`
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    /// Number of horizon steps
    pub fn len(&self) -> usize {
        self.forecast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecast.is_empty()
    }

    /// Iterate `(forecast, lower, upper)` per step
    pub fn steps(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.forecast
            .iter()
            .zip(self.lower.iter())
            .zip(self.upper.iter())
            .map(|((&f, &l), &u)| (f, l, u))
    }
}

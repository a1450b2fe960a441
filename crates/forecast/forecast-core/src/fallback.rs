//! Persistence fallback
//!
//! Used when model fitting fails: the mean of the history is projected flat
//! over the horizon with a symmetric band of 10% of its magnitude. The band
//! is a fixed heuristic, not a statistical interval, so the confidence level
//! is only carried through.

use forecast_spi::{ConfidenceInterval, FallbackPolicy, PERSISTENCE};

/// Fraction of `|mean|` used for the fallback band
pub const PERSISTENCE_BAND: f64 = 0.1;

/// Mean-of-series persistence forecast
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceFallback;

impl PersistenceFallback {
    pub fn new() -> Self {
        Self
    }
}

impl FallbackPolicy for PersistenceFallback {
    fn name(&self) -> &str {
        PERSISTENCE
    }

    fn project(&self, history: &[f64], steps: usize, confidence_level: f64) -> ConfidenceInterval {
        let mean = history.iter().sum::<f64>() / history.len() as f64;
        let half_width = PERSISTENCE_BAND * mean.abs();

        ConfidenceInterval {
            forecast: vec![mean; steps],
            lower: vec![mean - half_width; steps],
            upper: vec![mean + half_width; steps],
            confidence_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_mean_projection() {
        let interval = PersistenceFallback.project(&[5.0, 5.0], 2, 0.95);
        assert_eq!(interval.forecast, vec![5.0, 5.0]);
        assert_eq!(interval.lower, vec![4.5, 4.5]);
        assert_eq!(interval.upper, vec![5.5, 5.5]);
    }

    #[test]
    fn test_negative_mean_keeps_bounds_ordered() {
        let interval = PersistenceFallback.project(&[-10.0, -30.0], 1, 0.95);
        assert_eq!(interval.forecast, vec![-20.0]);
        assert_eq!(interval.lower, vec![-22.0]);
        assert_eq!(interval.upper, vec![-18.0]);
    }

    #[test]
    fn test_zero_mean_collapses_band() {
        let interval = PersistenceFallback.project(&[-1.0, 1.0], 3, 0.95);
        for (f, l, u) in interval.steps() {
            assert_eq!((f, l, u), (0.0, 0.0, 0.0));
        }
    }
}

//! Confidence interval construction
//!
//! Turns point forecasts and their standard errors into two-sided intervals.

use forecast_spi::{ConfidenceInterval, FitError, FitResult};
use statrs::distribution::{ContinuousCDF, Normal};

/// Build `forecast ± z·se` bounds for the given confidence level
pub fn from_standard_errors(
    forecast: Vec<f64>,
    std_errors: &[f64],
    confidence_level: f64,
) -> FitResult<ConfidenceInterval> {
    let z = z_score(confidence_level).ok_or_else(|| {
        FitError::NonFinite(format!("critical value for confidence level {}", confidence_level))
    })?;

    let lower = forecast
        .iter()
        .zip(std_errors.iter())
        .map(|(&f, &se)| f - z * se)
        .collect();

    let upper = forecast
        .iter()
        .zip(std_errors.iter())
        .map(|(&f, &se)| f + z * se)
        .collect();

    Ok(ConfidenceInterval {
        forecast,
        lower,
        upper,
        confidence_level,
    })
}

/// Two-sided standard normal critical value `Φ⁻¹(1 − α/2)`.
///
/// `None` unless the level is strictly between 0 and 1.
pub fn z_score(confidence_level: f64) -> Option<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return None;
    }
    let normal = Normal::new(0.0, 1.0).ok()?;
    let alpha = 1.0 - confidence_level;
    Some(normal.inverse_cdf(1.0 - alpha / 2.0)).filter(|z| z.is_finite())
}

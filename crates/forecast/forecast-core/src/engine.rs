//! Forecast engine
//!
//! Runs one forecast as a two-stage state machine: the fit stage either yields
//! the model's own interval or a [`FitOutcome::Degraded`] projection from the
//! fallback policy, and the assembly stage merges that projection with the
//! history into a [`ForecastTable`]. Only missing data aborts a forecast;
//! every fitting failure, panics included, is absorbed by the fallback.

use crate::arima::Arima;
use crate::fallback::PersistenceFallback;
use crate::table;
use forecast_spi::{
    ArimaOrder, ConfidenceInterval, FallbackPolicy, FitError, FitOutcome, FitResult,
    ForecastError, ForecastTable, Result, SeriesModel, YearSeries,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Forecast `steps` years past the last non-missing value with an ARIMA model
/// of the given order, falling back to persistence when the fit fails.
///
/// Fails with [`ForecastError::NoData`] when every value is missing.
pub fn forecast(
    years: &[i32],
    values: &[Option<f64>],
    steps: usize,
    order: ArimaOrder,
) -> Result<ForecastTable> {
    ForecastEngine::new(order, steps).forecast(years, values)
}

/// Stateless forecast runner; one engine can serve any number of series
#[derive(Debug, Clone)]
pub struct ForecastEngine<P = PersistenceFallback> {
    order: ArimaOrder,
    steps: usize,
    confidence_level: f64,
    fallback: P,
}

impl ForecastEngine {
    /// Engine with a 95% interval and the persistence fallback
    pub fn new(order: ArimaOrder, steps: usize) -> Self {
        Self {
            order,
            steps,
            confidence_level: 0.95,
            fallback: PersistenceFallback,
        }
    }
}

impl<P: FallbackPolicy> ForecastEngine<P> {
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Swap the fallback policy
    pub fn with_fallback<Q: FallbackPolicy>(self, fallback: Q) -> ForecastEngine<Q> {
        ForecastEngine {
            order: self.order,
            steps: self.steps,
            confidence_level: self.confidence_level,
            fallback,
        }
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(ForecastError::invalid("steps", "must be at least 1"));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::invalid(
                "confidence_level",
                "must be strictly between 0 and 1",
            ));
        }
        Ok(())
    }

    /// Forecast with a fresh ARIMA model of the configured order
    pub fn forecast(&self, years: &[i32], values: &[Option<f64>]) -> Result<ForecastTable> {
        let model = Arima::with_order(self.order)?;
        self.forecast_with(model, years, values)
    }

    /// Forecast with a caller-supplied model
    pub fn forecast_with<M: SeriesModel>(
        &self,
        mut model: M,
        years: &[i32],
        values: &[Option<f64>],
    ) -> Result<ForecastTable> {
        self.validate()?;

        let series = YearSeries::from_aligned(years, values)?;
        let horizon = series.horizon(self.steps)?;
        let history = series.observed_values();

        let outcome = self.fit_stage(&mut model, &history);
        Ok(table::assemble(&series, &horizon, &outcome))
    }

    /// Fit `model` to a non-empty history, degrading to the fallback policy
    /// on any failure
    pub fn fit_stage<M: SeriesModel>(&self, model: &mut M, history: &[f64]) -> FitOutcome {
        match attempt_fit(model, history, self.steps, self.confidence_level) {
            Ok(interval) => FitOutcome::Fitted {
                model: model.name(),
                interval,
            },
            Err(reason) => {
                tracing::debug!(
                    model = %model.name(),
                    fallback = self.fallback.name(),
                    %reason,
                    "model fit failed, degrading forecast"
                );
                FitOutcome::Degraded {
                    policy: self.fallback.name().to_string(),
                    interval: self.fallback.project(history, self.steps, self.confidence_level),
                    reason,
                }
            }
        }
    }
}

fn attempt_fit<M: SeriesModel>(
    model: &mut M,
    history: &[f64],
    steps: usize,
    confidence_level: f64,
) -> FitResult<ConfidenceInterval> {
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
        model.fit(history)?;
        model.forecast_interval(steps, confidence_level)
    }));
    let interval = attempt.map_err(|payload| FitError::Panicked(panic_message(payload)))??;

    if interval.len() != steps {
        return Err(FitError::NonFinite(format!(
            "model returned {} steps, expected {}",
            interval.len(),
            steps
        )));
    }
    if interval
        .steps()
        .any(|(f, l, u)| !(f.is_finite() && l.is_finite() && u.is_finite()))
    {
        return Err(FitError::NonFinite("forecast interval".to_string()));
    }
    Ok(interval)
}

/// Text of a caught panic payload
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

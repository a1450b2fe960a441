//! Outcome of the fit stage

use crate::error::FitError;
use crate::model::{ConfidenceInterval, ForecastMethod};

/// Result of attempting a model fit: either the model's own interval or the
/// fallback projection together with the failure that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    /// The model fitted and produced its native interval
    Fitted {
        model: String,
        interval: ConfidenceInterval,
    },
    /// Fitting failed and the named fallback policy projected instead
    Degraded {
        policy: String,
        reason: FitError,
        interval: ConfidenceInterval,
    },
}

impl FitOutcome {
    pub fn interval(&self) -> &ConfidenceInterval {
        match self {
            Self::Fitted { interval, .. } | Self::Degraded { interval, .. } => interval,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn method(&self) -> ForecastMethod {
        match self {
            Self::Fitted { model, .. } => ForecastMethod::Model(model.clone()),
            Self::Degraded { policy, .. } => ForecastMethod::fallback(policy),
        }
    }
}

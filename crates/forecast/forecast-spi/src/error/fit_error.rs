//! Model fitting failures
//!
//! These never reach engine callers: any `FitError` sends the engine down the
//! persistence fallback branch.

use thiserror::Error;

/// Reasons a model could not be fitted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Too few observations left after differencing for the parameter count
    #[error("Insufficient degrees of freedom: {observations} observations for {parameters} parameters")]
    InsufficientDegreesOfFreedom {
        observations: usize,
        parameters: usize,
    },

    /// Data or estimates contain NaN or infinite values
    #[error("Non-finite value: {0}")]
    NonFinite(String),

    /// The optimiser ran out of iterations
    #[error("Optimiser did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    /// Forecast requested before a successful fit
    #[error("Model must be fitted before forecasting")]
    NotFitted,

    /// The fitting routine panicked
    #[error("Fitting routine panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_of_freedom_message() {
        let error = FitError::InsufficientDegreesOfFreedom {
            observations: 1,
            parameters: 3,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient degrees of freedom: 1 observations for 3 parameters"
        );
    }

    #[test]
    fn test_non_convergence_message() {
        let error = FitError::NonConvergence { iterations: 5000 };
        assert_eq!(
            error.to_string(),
            "Optimiser did not converge after 5000 iterations"
        );
    }

    #[test]
    fn test_non_finite_with_various_messages() {
        for msg in ["sigma2 is NaN", "residual overflow", "data contains inf"] {
            let error = FitError::NonFinite(msg.to_string());
            assert_eq!(error.to_string(), format!("Non-finite value: {}", msg));
        }
    }
}

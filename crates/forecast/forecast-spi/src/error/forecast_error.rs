//! Forecast error types

use thiserror::Error;

/// Errors surfaced to callers of the forecast engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Every input value was missing
    #[error("No non-missing values to fit")]
    NoData,

    /// `years` and `values` are not positionally aligned
    #[error("Misaligned input: {years} years but {values} values")]
    MisalignedInput { years: usize, values: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl ForecastError {
    /// Shorthand for [`ForecastError::InvalidParameter`]
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_no_data_error_message() {
        assert_eq!(ForecastError::NoData.to_string(), "No non-missing values to fit");
    }

    #[test]
    fn test_misaligned_input_error_message() {
        let error = ForecastError::MisalignedInput { years: 4, values: 3 };
        assert_eq!(error.to_string(), "Misaligned input: 4 years but 3 values");
    }

    #[test]
    fn test_invalid_parameter_error_message() {
        let error = ForecastError::invalid("steps", "must be at least 1");
        assert_eq!(error.to_string(), "Invalid parameter 'steps': must be at least 1");
    }

    #[test]
    fn test_invalid_parameter_error_fields() {
        let error = ForecastError::invalid("confidence_level", "must be in (0, 1)");
        if let ForecastError::InvalidParameter { name, reason } = error {
            assert_eq!(name, "confidence_level");
            assert_eq!(reason, "must be in (0, 1)");
        } else {
            panic!("Expected InvalidParameter variant");
        }
    }

    #[test]
    fn test_error_implements_std_error() {
        let error: Box<dyn Error> = Box::new(ForecastError::NoData);
        assert!(error.source().is_none());
    }

    #[test]
    fn test_all_variants_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ForecastError>();
    }

    #[test]
    fn test_error_downcast() {
        let error: Box<dyn Error + Send + Sync> = Box::new(ForecastError::NoData);
        let downcasted = error.downcast_ref::<ForecastError>();
        assert!(matches!(downcasted, Some(ForecastError::NoData)));
    }
}

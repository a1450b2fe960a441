//! Error module containing error types and result aliases

mod fit_error;
mod forecast_error;

pub use fit_error::FitError;
pub use forecast_error::ForecastError;

/// Result type for forecast operations
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Result type for model fitting, absorbed by the engine
pub type FitResult<T> = std::result::Result<T, FitError>;

//! Batch error types.

use data_facade::DataError;
use forecast_facade::ForecastError;
use thiserror::Error;

/// Errors that abort a batch run or a store read.
///
/// Per-entity forecast failures never surface here; they are recorded in the
/// [`BatchReport`](crate::BatchReport) instead.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),
}

pub type Result<T> = std::result::Result<T, BatchError>;

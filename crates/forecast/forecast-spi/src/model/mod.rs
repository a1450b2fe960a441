//! Model module containing data structures

mod arima_order;
mod confidence_interval;
mod fit_outcome;
mod forecast_table;
mod year_series;

pub use arima_order::ArimaOrder;
pub use confidence_interval::ConfidenceInterval;
pub use fit_outcome::FitOutcome;
pub use forecast_table::{ForecastMethod, ForecastRow, ForecastTable, PERSISTENCE};
pub use year_series::YearSeries;

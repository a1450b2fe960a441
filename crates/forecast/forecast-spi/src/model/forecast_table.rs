//! Forecast result table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy name of the mean-of-series persistence fallback
pub const PERSISTENCE: &str = "persistence";

/// Which branch of the engine produced a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastMethod {
    /// A fitted model, identified by name (e.g. `ARIMA(1,1,1)`)
    Model(String),
    /// Mean-of-series persistence fallback
    Persistence,
    /// Any other fallback policy, identified by name
    Fallback(String),
}

impl ForecastMethod {
    /// Method for a table projected by the named fallback policy
    pub fn fallback(policy: &str) -> Self {
        if policy == PERSISTENCE {
            Self::Persistence
        } else {
            Self::Fallback(policy.to_string())
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Model(_))
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(name) | Self::Fallback(name) => f.write_str(name),
            Self::Persistence => f.write_str(PERSISTENCE),
        }
    }
}

/// One year of a forecast table.
///
/// History rows carry `observed` (possibly missing); forecast rows carry
/// `forecast`, `lower` and `upper`. A row never has both `observed` and
/// `forecast`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub year: i32,
    pub observed: Option<f64>,
    pub forecast: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl ForecastRow {
    /// A history row
    pub fn history(year: i32, observed: Option<f64>) -> Self {
        Self {
            year,
            observed,
            forecast: None,
            lower: None,
            upper: None,
        }
    }

    /// A forecast row
    pub fn projected(year: i32, forecast: f64, lower: f64, upper: f64) -> Self {
        Self {
            year,
            observed: None,
            forecast: Some(forecast),
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn is_forecast(&self) -> bool {
        self.forecast.is_some()
    }
}

/// History and forecast rows in ascending year order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
    method: ForecastMethod,
    confidence_level: f64,
}

impl ForecastTable {
    /// Rows are sorted by year on construction
    pub fn new(mut rows: Vec<ForecastRow>, method: ForecastMethod, confidence_level: f64) -> Self {
        rows.sort_by_key(|row| row.year);
        Self {
            rows,
            method,
            confidence_level,
        }
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ForecastRow> {
        self.rows
    }

    pub fn method(&self) -> &ForecastMethod {
        &self.method
    }

    /// True when a fallback policy produced the forecast
    pub fn is_degraded(&self) -> bool {
        self.method.is_fallback()
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Rows holding a non-missing observation
    pub fn history(&self) -> impl Iterator<Item = &ForecastRow> {
        self.rows.iter().filter(|row| row.observed.is_some())
    }

    /// Rows holding a point forecast
    pub fn forecasts(&self) -> impl Iterator<Item = &ForecastRow> {
        self.rows.iter().filter(|row| row.is_forecast())
    }

    pub fn forecast_years(&self) -> Vec<i32> {
        self.forecasts().map(|row| row.year).collect()
    }

    /// Look up the row for a year
    pub fn row(&self, year: i32) -> Option<&ForecastRow> {
        self.rows
            .binary_search_by_key(&year, |row| row.year)
            .ok()
            .map(|idx| &self.rows[idx])
    }
}

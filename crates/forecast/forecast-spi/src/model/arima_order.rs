//! ARIMA order model

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `(p, d, q)` order of an ARIMA model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ArimaOrder {
    /// Largest supported AR or MA order
    pub const MAX_ARMA: usize = 10;
    /// Largest supported differencing order
    pub const MAX_DIFFERENCING: usize = 2;

    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Number of estimated ARMA coefficients
    pub fn parameter_count(&self) -> usize {
        self.p + self.q
    }

    /// Check the order against the supported limits
    pub fn validate(&self) -> Result<()> {
        if self.p > Self::MAX_ARMA {
            return Err(ForecastError::invalid("p", "AR order must be <= 10"));
        }
        if self.d > Self::MAX_DIFFERENCING {
            return Err(ForecastError::invalid("d", "Differencing order must be <= 2"));
        }
        if self.q > Self::MAX_ARMA {
            return Err(ForecastError::invalid("q", "MA order must be <= 10"));
        }
        Ok(())
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Parses `"p,d,q"`, e.g. `"1,1,1"`
impl FromStr for ArimaOrder {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ForecastError::invalid("order", format!("expected p,d,q, got '{}'", s)));
        }
        let parse = |name: &str, raw: &str| {
            raw.parse::<usize>()
                .map_err(|e| ForecastError::invalid(name, e.to_string()))
        };
        let order = Self::new(parse("p", parts[0])?, parse("d", parts[1])?, parse("q", parts[2])?);
        order.validate()?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        assert_eq!(ArimaOrder::default(), ArimaOrder::new(1, 1, 1));
        assert_eq!(ArimaOrder::default().parameter_count(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(ArimaOrder::new(2, 1, 0).to_string(), "ARIMA(2,1,0)");
    }

    #[test]
    fn test_parse() {
        assert_eq!("1, 0, 2".parse::<ArimaOrder>().unwrap(), ArimaOrder::new(1, 0, 2));
        assert!("1,1".parse::<ArimaOrder>().is_err());
        assert!("a,1,1".parse::<ArimaOrder>().is_err());
        assert!("1,3,1".parse::<ArimaOrder>().is_err());
    }

    #[test]
    fn test_validate_limits() {
        assert!(ArimaOrder::new(10, 2, 10).validate().is_ok());
        assert!(ArimaOrder::new(11, 0, 0).validate().is_err());
        assert!(ArimaOrder::new(0, 0, 11).validate().is_err());
    }
}

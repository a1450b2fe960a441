//! Year-indexed observation series

use crate::error::{ForecastError, Result};
use std::collections::BTreeMap;

/// Yearly observations of one metric for one entity.
///
/// Values are keyed by year rather than by position. `None` marks a missing
/// observation; non-finite floats are stored as missing too. When a year
/// appears more than once in the input, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearSeries {
    values: BTreeMap<i32, Option<f64>>,
}

impl YearSeries {
    /// Build a series from positionally aligned years and values
    pub fn from_aligned(years: &[i32], values: &[Option<f64>]) -> Result<Self> {
        if years.len() != values.len() {
            return Err(ForecastError::MisalignedInput {
                years: years.len(),
                values: values.len(),
            });
        }

        let mut map = BTreeMap::new();
        for (&year, &value) in years.iter().zip(values.iter()) {
            let value = value.filter(|v| v.is_finite());
            if map.insert(year, value).is_some() {
                tracing::warn!(year, "duplicate year in series, keeping the last value");
            }
        }

        Ok(Self { values: map })
    }

    /// Number of distinct years, missing ones included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All `(year, value)` pairs in ascending year order
    pub fn iter(&self) -> impl Iterator<Item = (i32, Option<f64>)> + '_ {
        self.values.iter().map(|(&year, &value)| (year, value))
    }

    /// Non-missing `(year, value)` pairs in ascending year order
    pub fn observed(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values
            .iter()
            .filter_map(|(&year, &value)| value.map(|v| (year, v)))
    }

    /// Non-missing values in ascending year order
    pub fn observed_values(&self) -> Vec<f64> {
        self.observed().map(|(_, v)| v).collect()
    }

    pub fn observed_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }

    /// Latest year holding a non-missing value
    pub fn last_observed_year(&self) -> Option<i32> {
        self.values
            .iter()
            .rev()
            .find(|(_, value)| value.is_some())
            .map(|(&year, _)| year)
    }

    /// Arithmetic mean of the non-missing values
    pub fn mean(&self) -> Option<f64> {
        let values = self.observed_values();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// The `steps` consecutive years after the last non-missing year.
    ///
    /// `NoData` when nothing is observed; `InvalidParameter` when the last
    /// forecast year would not fit in an `i32`.
    pub fn horizon(&self, steps: usize) -> Result<Vec<i32>> {
        let last = self.last_observed_year().ok_or(ForecastError::NoData)?;
        let steps = i32::try_from(steps)
            .map_err(|_| ForecastError::invalid("steps", format!("{} exceeds the year range", steps)))?;
        let end = last.checked_add(steps).ok_or_else(|| {
            ForecastError::invalid("steps", format!("{} steps past {} overflows the year range", steps, last))
        })?;
        Ok((1..=steps).map(|h| last + h).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_aligned_sorts_by_year() {
        let series =
            YearSeries::from_aligned(&[2002, 2000, 2001], &[Some(3.0), Some(1.0), Some(2.0)]).unwrap();
        let years: Vec<i32> = series.iter().map(|(y, _)| y).collect();
        assert_eq!(years, vec![2000, 2001, 2002]);
        assert_eq!(series.observed_values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_misaligned_input() {
        let err = YearSeries::from_aligned(&[2000, 2001], &[Some(1.0)]).unwrap_err();
        assert_eq!(err, ForecastError::MisalignedInput { years: 2, values: 1 });
    }

    #[test]
    fn test_missing_values_are_kept_but_not_observed() {
        let series =
            YearSeries::from_aligned(&[2000, 2001, 2002], &[Some(5.0), None, Some(f64::NAN)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.observed_count(), 1);
        assert_eq!(series.last_observed_year(), Some(2000));
        assert_eq!(series.mean(), Some(5.0));
    }

    #[test]
    fn test_duplicate_year_keeps_last() {
        let series = YearSeries::from_aligned(&[2000, 2000], &[Some(1.0), Some(9.0)]).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.observed_values(), vec![9.0]);
    }

    #[test]
    fn test_horizon_starts_after_last_observed() {
        let series = YearSeries::from_aligned(&[1990, 2005, 2006], &[Some(1.0), Some(2.0), None]).unwrap();
        assert_eq!(series.horizon(3), Ok(vec![2006, 2007, 2008]));
    }

    #[test]
    fn test_all_missing_has_no_horizon() {
        let series = YearSeries::from_aligned(&[2000, 2001], &[None, None]).unwrap();
        assert_eq!(series.last_observed_year(), None);
        assert_eq!(series.mean(), None);
        assert_eq!(series.horizon(2), Err(ForecastError::NoData));
    }

    #[test]
    fn test_horizon_overflow_rejected() {
        let series = YearSeries::from_aligned(&[i32::MAX - 1], &[Some(1.0)]).unwrap();
        assert_eq!(series.horizon(1), Ok(vec![i32::MAX]));
        assert!(matches!(
            series.horizon(2),
            Err(ForecastError::InvalidParameter { name, .. }) if name == "steps"
        ));
    }

    #[test]
    fn test_horizon_steps_beyond_i32_rejected() {
        let series = YearSeries::from_aligned(&[2000], &[Some(1.0)]).unwrap();
        assert!(matches!(
            series.horizon(usize::MAX),
            Err(ForecastError::InvalidParameter { .. })
        ));
    }
}

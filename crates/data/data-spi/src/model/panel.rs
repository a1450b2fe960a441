//! Country-year panel model.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Entity name of the global aggregate series
pub const GLOBAL_ENTITY: &str = "World (total)";

/// Entity code of the global aggregate series
pub const GLOBAL_CODE: &str = "GLOBAL";

/// One entity-year row; `values` is aligned with [`Panel::metrics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRow {
    pub entity: String,
    pub code: Option<String>,
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

/// Yearly values of one metric for one entity, sorted by year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub entity: String,
    pub code: Option<String>,
    pub metric: String,
    pub years: Vec<i32>,
    pub values: Vec<Option<f64>>,
}

impl MetricSeries {
    /// Number of non-missing values
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// In-memory country-year panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    metrics: Vec<String>,
    rows: Vec<PanelRow>,
}

impl Panel {
    pub fn new(metrics: Vec<String>, rows: Vec<PanelRow>) -> Self {
        Self { metrics, rows }
    }

    /// Metric column names, in source order
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn metric_index(&self, metric: &str) -> Result<usize> {
        self.metrics
            .iter()
            .position(|m| m == metric)
            .ok_or_else(|| DataError::UnknownMetric(metric.to_string()))
    }

    /// Distinct entity names, sorted
    pub fn entities(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| row.entity.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// First non-empty code recorded for an entity
    pub fn code_for(&self, entity: &str) -> Option<&str> {
        self.rows
            .iter()
            .filter(|row| row.entity == entity)
            .find_map(|row| row.code.as_deref())
    }

    /// One entity's series for a metric; empty when the entity is unknown
    pub fn series(&self, entity: &str, metric: &str) -> Result<MetricSeries> {
        let idx = self.metric_index(metric)?;

        let mut points: Vec<(i32, Option<f64>)> = self
            .rows
            .iter()
            .filter(|row| row.entity == entity)
            .map(|row| (row.year, row.values.get(idx).copied().flatten()))
            .collect();
        points.sort_by_key(|(year, _)| *year);

        let (years, values) = points.into_iter().unzip();
        Ok(MetricSeries {
            entity: entity.to_string(),
            code: self.code_for(entity).map(str::to_string),
            metric: metric.to_string(),
            years,
            values,
        })
    }

    /// Number of non-missing values of a metric for an entity
    pub fn present_count(&self, entity: &str, metric: &str) -> Result<usize> {
        let idx = self.metric_index(metric)?;
        Ok(self
            .rows
            .iter()
            .filter(|row| row.entity == entity)
            .filter(|row| row.values.get(idx).copied().flatten().is_some())
            .count())
    }

    /// Per-year sum of a metric across all entities.
    ///
    /// Years where no entity reports a value stay missing.
    pub fn global_series(&self, metric: &str) -> Result<MetricSeries> {
        let idx = self.metric_index(metric)?;

        let mut totals: BTreeMap<i32, Option<f64>> = BTreeMap::new();
        for row in &self.rows {
            let total = totals.entry(row.year).or_insert(None);
            if let Some(value) = row.values.get(idx).copied().flatten() {
                *total = Some(total.unwrap_or(0.0) + value);
            }
        }

        let (years, values) = totals.into_iter().unzip();
        Ok(MetricSeries {
            entity: GLOBAL_ENTITY.to_string(),
            code: Some(GLOBAL_CODE.to_string()),
            metric: metric.to_string(),
            years,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entity: &str, code: Option<&str>, year: i32, values: Vec<Option<f64>>) -> PanelRow {
        PanelRow {
            entity: entity.to_string(),
            code: code.map(str::to_string),
            year,
            values,
        }
    }

    fn sample_panel() -> Panel {
        Panel::new(
            vec!["co2".to_string(), "gdp".to_string()],
            vec![
                row("France", Some("FRA"), 2001, vec![Some(2.0), None]),
                row("France", Some("FRA"), 2000, vec![Some(1.0), Some(10.0)]),
                row("Chad", Some("TCD"), 2000, vec![Some(0.5), None]),
                row("Chad", Some("TCD"), 2001, vec![None, None]),
                row("Chad", Some("TCD"), 2002, vec![None, Some(3.0)]),
            ],
        )
    }

    #[test]
    fn test_entities_sorted_unique() {
        assert_eq!(sample_panel().entities(), vec!["Chad", "France"]);
    }

    #[test]
    fn test_series_sorted_by_year() {
        let series = sample_panel().series("France", "co2").unwrap();
        assert_eq!(series.years, vec![2000, 2001]);
        assert_eq!(series.values, vec![Some(1.0), Some(2.0)]);
        assert_eq!(series.code.as_deref(), Some("FRA"));
        assert_eq!(series.present_count(), 2);
    }

    #[test]
    fn test_present_count() {
        let panel = sample_panel();
        assert_eq!(panel.present_count("Chad", "co2").unwrap(), 1);
        assert_eq!(panel.present_count("Chad", "gdp").unwrap(), 1);
        assert_eq!(panel.present_count("Atlantis", "gdp").unwrap(), 0);
        assert!(panel.present_count("Chad", "methane").is_err());
    }

    #[test]
    fn test_unknown_metric() {
        let err = sample_panel().series("France", "methane").unwrap_err();
        assert!(matches!(err, DataError::UnknownMetric(m) if m == "methane"));
    }

    #[test]
    fn test_unknown_entity_is_empty() {
        let series = sample_panel().series("Atlantis", "co2").unwrap();
        assert!(series.is_empty());
        assert_eq!(series.code, None);
    }

    #[test]
    fn test_global_series_sums_present_values() {
        let global = sample_panel().global_series("co2").unwrap();
        assert_eq!(global.entity, GLOBAL_ENTITY);
        assert_eq!(global.code.as_deref(), Some(GLOBAL_CODE));
        assert_eq!(global.years, vec![2000, 2001, 2002]);
        assert_eq!(global.values, vec![Some(1.5), Some(2.0), None]);
    }
}

//! Batch forecast generator.

use crate::chart;
use crate::config::BatchConfig;
use crate::error::Result;
use crate::record::ForecastRecord;
use crate::store;
use data_facade::{DataError, MetricSeries, Panel};
use forecast_facade::engine::panic_message;
use forecast_facade::ForecastTable;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

/// Why an entity got no forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SkipReason {
    /// Fewer non-missing values than the configured minimum
    TooFewPoints { present: usize, required: usize },
    /// The forecaster returned an error or panicked
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { present, required } => write!(
                f,
                "only {} non-missing points (need {})",
                present, required
            ),
            Self::Failed(message) => write!(f, "forecast failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntity {
    pub entity: String,
    pub reason: SkipReason,
}

/// Forecast of one entity for one metric
#[derive(Debug, Clone)]
pub struct EntityForecast {
    pub entity: String,
    pub code: Option<String>,
    pub metric: String,
    pub table: ForecastTable,
}

impl EntityForecast {
    pub fn records(&self) -> Vec<ForecastRecord> {
        self.table
            .rows()
            .iter()
            .map(|row| {
                ForecastRecord::from_row(row, &self.entity, self.code.as_deref(), &self.metric)
            })
            .collect()
    }
}

/// Outcome of one metric
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricReport {
    pub metric: String,
    /// Entities forecast, including degraded ones
    pub forecasts: usize,
    /// Entities that used the persistence fallback
    pub degraded: usize,
    pub skipped: Vec<SkippedEntity>,
    /// Table path; `None` when nothing was forecast
    pub table: Option<PathBuf>,
    pub plots: Vec<PathBuf>,
}

/// Outcome of a batch run, one entry per metric
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub metrics: Vec<MetricReport>,
}

impl BatchReport {
    pub fn total_forecasts(&self) -> usize {
        self.metrics.iter().map(|m| m.forecasts).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.metrics.iter().map(|m| m.skipped.len()).sum()
    }

    /// Every file written by the run
    pub fn files(&self) -> Vec<&PathBuf> {
        self.metrics
            .iter()
            .flat_map(|m| m.table.iter().chain(m.plots.iter()))
            .collect()
    }
}

/// Forecasts every entity of a panel.
///
/// # Example
///
/// ```rust,ignore
/// use forecast_batch::{BatchConfig, BatchGenerator};
///
/// let config = BatchConfig::builder().metric("co2").output_dir("data").build()?;
/// let report = BatchGenerator::new(config).run(&panel)?;
/// println!("{} forecasts, {} skipped", report.total_forecasts(), report.total_skipped());
/// ```
#[derive(Debug, Clone)]
pub struct BatchGenerator {
    config: BatchConfig,
}

impl BatchGenerator {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    fn metrics<'a>(&'a self, panel: &'a Panel) -> Result<Vec<&'a str>> {
        if self.config.metrics.is_empty() {
            return Ok(panel.metrics().iter().map(String::as_str).collect());
        }
        for metric in &self.config.metrics {
            if !panel.metrics().contains(metric) {
                return Err(DataError::UnknownMetric(metric.clone()).into());
            }
        }
        Ok(self.config.metrics.iter().map(String::as_str).collect())
    }

    /// Forecast every configured metric and write tables and charts.
    ///
    /// Only configuration and output errors abort the run.
    pub fn run(&self, panel: &Panel) -> Result<BatchReport> {
        self.config.validate()?;
        let metrics = self.metrics(panel)?;

        let mut report = BatchReport::default();
        for metric in metrics {
            report.metrics.push(self.run_metric(panel, metric)?);
        }
        Ok(report)
    }

    fn run_metric(&self, panel: &Panel, metric: &str) -> Result<MetricReport> {
        let (forecasts, skipped) = self.forecast_metric(panel, metric)?;

        let mut report = MetricReport {
            metric: metric.to_string(),
            forecasts: forecasts.len(),
            degraded: forecasts.iter().filter(|f| f.table.is_degraded()).count(),
            skipped,
            ..MetricReport::default()
        };

        if forecasts.is_empty() {
            tracing::error!(metric, "no forecasts were generated");
            return Ok(report);
        }

        let records: Vec<ForecastRecord> = forecasts.iter().flat_map(|f| f.records()).collect();
        let path = store::table_path(&self.config.output_dir, metric);
        store::write_records(&path, &records)?;
        tracing::info!(metric, path = %path.display(), rows = records.len(), "wrote forecast table");
        report.table = Some(path);

        if self.config.write_plots {
            let dir = self.config.plots_dir(metric);
            for forecast in &forecasts {
                match chart::write_chart(&dir, &forecast.entity, metric, &forecast.table) {
                    Ok(path) => report.plots.push(path),
                    Err(e) => {
                        tracing::warn!(entity = %forecast.entity, metric, error = %e, "failed to create plot")
                    }
                }
            }
            tracing::info!(metric, dir = %dir.display(), plots = report.plots.len(), "wrote plots");
        }

        tracing::info!(
            metric,
            forecasts = report.forecasts,
            degraded = report.degraded,
            skipped = report.skipped.len(),
            "metric complete"
        );
        Ok(report)
    }

    /// Forecast one metric without writing anything.
    ///
    /// Returns the forecasts sorted by entity and the skipped entities.
    pub fn forecast_metric(
        &self,
        panel: &Panel,
        metric: &str,
    ) -> Result<(Vec<EntityForecast>, Vec<SkippedEntity>)> {
        let engine = self.config.forecast.engine()?;
        self.forecast_metric_with(panel, metric, |series| {
            engine.forecast(&series.years, &series.values)
        })
    }

    /// Like [`forecast_metric`](Self::forecast_metric) with a caller-supplied
    /// forecaster.
    ///
    /// An error or panic from the forecaster skips that entity only.
    pub fn forecast_metric_with<F>(
        &self,
        panel: &Panel,
        metric: &str,
        forecaster: F,
    ) -> Result<(Vec<EntityForecast>, Vec<SkippedEntity>)>
    where
        F: Fn(&MetricSeries) -> forecast_facade::Result<ForecastTable> + Sync,
    {
        let mut series = panel
            .entities()
            .into_iter()
            .map(|entity| panel.series(entity, metric))
            .collect::<std::result::Result<Vec<MetricSeries>, DataError>>()?;
        if self.config.include_global {
            series.push(panel.global_series(metric)?);
        }
        tracing::info!(metric, entities = series.len(), "computing forecasts");

        let outcomes: Vec<std::result::Result<EntityForecast, SkippedEntity>> = if self.config.parallel {
            series.par_iter().map(|s| self.forecast_entity(&forecaster, s)).collect()
        } else {
            series.iter().map(|s| self.forecast_entity(&forecaster, s)).collect()
        };

        let mut forecasts = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(forecast) => forecasts.push(forecast),
                Err(skip) => skipped.push(skip),
            }
        }
        forecasts.sort_by(|a, b| a.entity.cmp(&b.entity));
        skipped.sort_by(|a, b| a.entity.cmp(&b.entity));

        Ok((forecasts, skipped))
    }

    fn forecast_entity<F>(
        &self,
        forecaster: &F,
        series: &MetricSeries,
    ) -> std::result::Result<EntityForecast, SkippedEntity>
    where
        F: Fn(&MetricSeries) -> forecast_facade::Result<ForecastTable>,
    {
        let skip = |reason: SkipReason| SkippedEntity {
            entity: series.entity.clone(),
            reason,
        };

        let present = series.present_count();
        if present < self.config.min_points {
            tracing::info!(entity = %series.entity, metric = %series.metric, present, "skipping: too few points");
            return Err(skip(SkipReason::TooFewPoints {
                present,
                required: self.config.min_points,
            }));
        }

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| forecaster(series)));
        match attempt {
            Ok(Ok(table)) => {
                if table.is_degraded() {
                    tracing::debug!(entity = %series.entity, metric = %series.metric, "persistence fallback");
                }
                Ok(EntityForecast {
                    entity: series.entity.clone(),
                    code: series.code.clone(),
                    metric: series.metric.clone(),
                    table,
                })
            }
            Ok(Err(e)) => {
                tracing::warn!(entity = %series.entity, metric = %series.metric, error = %e, "forecast failed");
                Err(skip(SkipReason::Failed(e.to_string())))
            }
            Err(payload) => {
                let message = panic_message(payload);
                tracing::error!(entity = %series.entity, metric = %series.metric, panic = %message, "forecast panicked");
                Err(skip(SkipReason::Failed(format!("panicked: {}", message))))
            }
        }
    }
}

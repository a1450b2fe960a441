//! # emissions
//!
//! Command-line interface for country-year emissions forecasting.

use clap::{Parser, Subcommand};
use data_facade::{MetricSeries, Panel, PanelConfig, PanelSource};
use forecast_batch::{table_path, BatchConfig, BatchGenerator, ForecastLookup, ForecastStore, Unavailable};
use forecast_facade::{ArimaOrder, ForecastConfig, ForecastError, ForecastTable};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "emissions")]
#[command(about = "Country-year emissions forecasting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast every entity and write tables and charts
    Generate {
        /// OWID-style panel CSV
        #[arg(short, long, env = "EMISSIONS_INPUT")]
        input: PathBuf,

        /// Metric column to forecast (repeatable)
        #[arg(short, long, default_value = "co2")]
        metric: Vec<String>,

        /// Number of years to forecast
        #[arg(short, long, default_value = "5")]
        steps: usize,

        /// ARIMA order as p,d,q
        #[arg(long, default_value = "1,1,1")]
        order: ArimaOrder,

        /// Skip entities with fewer non-missing values
        #[arg(long, default_value = "6")]
        min_points: usize,

        /// Output directory
        #[arg(short, long, env = "EMISSIONS_OUT_DIR", default_value = "data")]
        out_dir: PathBuf,

        /// Do not render per-entity charts
        #[arg(long)]
        no_plots: bool,

        /// Forecast entities one at a time
        #[arg(long)]
        sequential: bool,

        /// Do not forecast the global aggregate
        #[arg(long)]
        no_global: bool,

        /// First year to load
        #[arg(long)]
        from_year: Option<i32>,

        /// Last year to load
        #[arg(long)]
        to_year: Option<i32>,
    },

    /// Forecast one entity on demand and print JSON
    Forecast {
        /// OWID-style panel CSV
        #[arg(short, long, env = "EMISSIONS_INPUT")]
        input: PathBuf,

        /// Entity (country) name
        #[arg(short, long, required_unless_present = "global", conflicts_with = "global")]
        entity: Option<String>,

        /// Forecast the per-year sum across all entities
        #[arg(long)]
        global: bool,

        /// Metric column
        #[arg(short, long, default_value = "co2")]
        metric: String,

        /// Number of years to forecast
        #[arg(short, long, default_value = "5")]
        steps: usize,

        /// ARIMA order as p,d,q
        #[arg(long, default_value = "1,1,1")]
        order: ArimaOrder,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up a precomputed forecast
    Show {
        /// Entity (country) name
        #[arg(short, long)]
        entity: String,

        /// Metric column
        #[arg(short, long, default_value = "co2")]
        metric: String,

        /// Forecast table; defaults to <out-dir>/forecasts_<metric>.csv
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// Directory written by `generate`
        #[arg(short, long, env = "EMISSIONS_OUT_DIR", default_value = "data")]
        out_dir: PathBuf,
    },
}

fn load_panel(input: PathBuf, metrics: &[String], years: Option<(i32, i32)>) -> CliResult<Panel> {
    let config = PanelConfig {
        metrics: metrics.to_vec(),
        years,
        ..PanelConfig::new(input)
    };
    let panel = config
        .source()
        .load()
        .map_err(|e| format!("Failed to load {:?}: {}", config.path, e))?;
    tracing::info!(rows = panel.len(), entities = panel.entities().len(), "loaded panel");
    Ok(panel)
}

fn year_range(from: Option<i32>, to: Option<i32>) -> Option<(i32, i32)> {
    match (from, to) {
        (None, None) => None,
        (from, to) => Some((from.unwrap_or(i32::MIN), to.unwrap_or(i32::MAX))),
    }
}

/// Run generate command
#[allow(clippy::too_many_arguments)]
fn run_generate(
    input: PathBuf,
    metrics: Vec<String>,
    steps: usize,
    order: ArimaOrder,
    min_points: usize,
    out_dir: PathBuf,
    write_plots: bool,
    parallel: bool,
    include_global: bool,
    years: Option<(i32, i32)>,
) -> CliResult<()> {
    let panel = load_panel(input, &metrics, years)?;

    let config = BatchConfig {
        metrics,
        forecast: ForecastConfig {
            steps,
            order,
            ..ForecastConfig::default()
        },
        min_points,
        output_dir: out_dir,
        write_plots,
        parallel,
        include_global,
    };
    let report = BatchGenerator::new(config)
        .run(&panel)
        .map_err(|e| e.to_string())?;

    for metric in &report.metrics {
        let table = metric
            .table
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no table written".to_string());
        println!(
            "{}: {} forecasts ({} degraded), {} skipped, {} plots -> {}",
            metric.metric,
            metric.forecasts,
            metric.degraded,
            metric.skipped.len(),
            metric.plots.len(),
            table
        );
    }
    println!(
        "Total: {} forecasts, {} skipped",
        report.total_forecasts(),
        report.total_skipped()
    );

    Ok(())
}

fn forecast_json(series: &MetricSeries, table: &ForecastTable) -> serde_json::Value {
    serde_json::json!({
        "entity": series.entity,
        "iso_code": series.code,
        "metric": series.metric,
        "method": table.method().to_string(),
        "degraded": table.is_degraded(),
        "confidence_level": table.confidence_level(),
        "rows": table.rows(),
    })
}

/// Forecast one series; `None` when every value is missing
fn forecast_series(
    series: &MetricSeries,
    steps: usize,
    order: ArimaOrder,
) -> CliResult<Option<ForecastTable>> {
    let engine = ForecastConfig {
        steps,
        order,
        ..ForecastConfig::default()
    }
    .engine()
    .map_err(|e| e.to_string())?;

    match engine.forecast(&series.years, &series.values) {
        Ok(table) => Ok(Some(table)),
        Err(ForecastError::NoData) => Ok(None),
        Err(e) => Err(format!("{} ({}): {}", series.entity, series.metric, e)),
    }
}

/// Run forecast command
fn run_forecast(
    input: PathBuf,
    entity: Option<String>,
    metric: String,
    steps: usize,
    order: ArimaOrder,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let panel = load_panel(input, std::slice::from_ref(&metric), None)?;

    let series = match &entity {
        Some(name) => panel.series(name, &metric),
        None => panel.global_series(&metric),
    }
    .map_err(|e| e.to_string())?;
    if series.is_empty() {
        return Err(format!("Unknown entity '{}'", series.entity));
    }

    let table = match forecast_series(&series, steps, order)? {
        Some(table) => table,
        None => {
            println!("No forecast available: {} ({}) has no values", series.entity, metric);
            return Ok(());
        }
    };

    let json = forecast_json(&series, &table);
    if let Some(path) = output {
        let mut file = File::create(&path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, &json)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("Forecast written to {:?}", path);
    } else {
        let text = serde_json::to_string_pretty(&json)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("{}", text);
    }

    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

/// Run show command
fn run_show(entity: String, metric: String, table: Option<PathBuf>, out_dir: PathBuf) -> CliResult<()> {
    let path = table.unwrap_or_else(|| table_path(&out_dir, &metric));
    let store = ForecastStore::open(&path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

    match store.lookup(&entity, &metric) {
        ForecastLookup::Available(records) => {
            println!("{} ({})", entity, metric);
            println!("{:>6} {:>14} {:>14} {:>14} {:>14}", "year", "observed", "forecast", "lower", "upper");
            for r in &records {
                println!(
                    "{:>6} {:>14} {:>14} {:>14} {:>14}",
                    r.year,
                    cell(r.observed),
                    cell(r.forecast),
                    cell(r.lower),
                    cell(r.upper)
                );
            }
        }
        ForecastLookup::Unavailable(reason) => {
            let detail = match reason {
                Unavailable::NoTable => format!("table {:?} not found", path),
                Unavailable::NoForecast => format!("no rows for {} ({})", entity, metric),
            };
            println!("No forecast available: {}", detail);
        }
    }

    Ok(())
}

fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emissions=info,forecast_batch=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            input,
            metric,
            steps,
            order,
            min_points,
            out_dir,
            no_plots,
            sequential,
            no_global,
            from_year,
            to_year,
        } => run_generate(
            input,
            metric,
            steps,
            order,
            min_points,
            out_dir,
            !no_plots,
            !sequential,
            !no_global,
            year_range(from_year, to_year),
        ),

        Commands::Forecast {
            input,
            entity,
            global: _,
            metric,
            steps,
            order,
            output,
        } => run_forecast(input, entity, metric, steps, order, output),

        Commands::Show {
            entity,
            metric,
            table,
            out_dir,
        } => run_show(entity, metric, table, out_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "emissions", "generate", "--input", "owid.csv", "--metric", "co2", "--metric", "gdp",
            "--no-plots", "--from-year", "1990",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                metric,
                steps,
                order,
                min_points,
                no_plots,
                sequential,
                from_year,
                to_year,
                ..
            } => {
                assert_eq!(metric, vec!["co2", "gdp"]);
                assert_eq!(steps, 5);
                assert_eq!(order, ArimaOrder::new(1, 1, 1));
                assert_eq!(min_points, 6);
                assert!(no_plots);
                assert!(!sequential);
                assert_eq!(year_range(from_year, to_year), Some((1990, i32::MAX)));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_forecast_order() {
        let cli = Cli::try_parse_from([
            "emissions", "forecast", "-i", "owid.csv", "--entity", "Chile", "--order", "2,1,0",
        ])
        .unwrap();
        match cli.command {
            Commands::Forecast { entity, order, .. } => {
                assert_eq!(entity.as_deref(), Some("Chile"));
                assert_eq!(order, ArimaOrder::new(2, 1, 0));
            }
            _ => panic!("expected forecast"),
        }
    }

    #[test]
    fn test_forecast_needs_entity_or_global() {
        assert!(Cli::try_parse_from(["emissions", "forecast", "-i", "owid.csv"]).is_err());
        assert!(Cli::try_parse_from([
            "emissions", "forecast", "-i", "owid.csv", "--entity", "Chile", "--global",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["emissions", "forecast", "-i", "owid.csv", "--global"]).is_ok());
    }

    #[test]
    fn test_invalid_order_rejected() {
        assert!(Cli::try_parse_from([
            "emissions", "forecast", "-i", "owid.csv", "--global", "--order", "1,1",
        ])
        .is_err());
    }

    #[test]
    fn test_year_range() {
        assert_eq!(year_range(None, None), None);
        assert_eq!(year_range(Some(1990), Some(2020)), Some((1990, 2020)));
        assert_eq!(year_range(None, Some(2000)), Some((i32::MIN, 2000)));
    }

    fn series(values: Vec<Option<f64>>) -> MetricSeries {
        MetricSeries {
            entity: "Chad".to_string(),
            code: Some("TCD".to_string()),
            metric: "co2".to_string(),
            years: (2000..2000 + values.len() as i32).collect(),
            values,
        }
    }

    #[test]
    fn test_all_missing_series_has_no_forecast() {
        let result = forecast_series(&series(vec![None, None, None]), 3, ArimaOrder::default());
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_forecast_series_produces_table() {
        let table = forecast_series(&series(vec![Some(1.0), None, Some(3.0)]), 2, ArimaOrder::default())
            .unwrap()
            .unwrap();
        assert_eq!(table.forecasts().count(), 2);
    }

    #[test]
    fn test_forecast_series_reports_bad_parameters() {
        let err = forecast_series(&series(vec![Some(1.0)]), 0, ArimaOrder::default()).unwrap_err();
        assert!(err.contains("steps"));
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(Some(1.5)), "1.5000");
        assert_eq!(cell(None), "");
    }
}

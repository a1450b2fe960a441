//! Data Core
//!
//! Panel source implementations. [`CsvPanelSource`] reads an OWID-style
//! country-year CSV (`country, year, iso_code, <metrics>...`).

pub use data_spi::{
    DataError, MetricSeries, Panel, PanelRow, PanelSource, Result, GLOBAL_CODE, GLOBAL_ENTITY,
};

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default entity column
pub const ENTITY_COLUMN: &str = "country";
/// Default entity code column
pub const CODE_COLUMN: &str = "iso_code";
/// Default year column
pub const YEAR_COLUMN: &str = "year";

/// Loads a panel from a CSV file with a header row.
///
/// Empty or unparsable metric cells are missing values. A year that cannot be
/// parsed fails the load.
#[derive(Debug, Clone)]
pub struct CsvPanelSource {
    path: PathBuf,
    entity_column: String,
    code_column: String,
    year_column: String,
    metrics: Option<Vec<String>>,
    year_range: Option<(i32, i32)>,
    drop_uncoded: bool,
}

impl CsvPanelSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            entity_column: ENTITY_COLUMN.to_string(),
            code_column: CODE_COLUMN.to_string(),
            year_column: YEAR_COLUMN.to_string(),
            metrics: None,
            year_range: None,
            drop_uncoded: true,
        }
    }

    /// Override the key column names
    pub fn with_columns(mut self, entity: &str, code: &str, year: &str) -> Self {
        self.entity_column = entity.to_string();
        self.code_column = code.to_string();
        self.year_column = year.to_string();
        self
    }

    /// Restrict the metric columns; by default every non-key column is kept
    pub fn with_metrics(mut self, metrics: Vec<String>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Keep only years in `min..=max`
    pub fn with_year_range(mut self, min: i32, max: i32) -> Self {
        self.year_range = Some((min, max));
        self
    }

    /// Keep rows without an entity code (regional aggregates in OWID data)
    pub fn keep_uncoded(mut self) -> Self {
        self.drop_uncoded = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a panel from any reader
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Panel> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_error)?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };

        let entity_idx = column(&self.entity_column)?;
        let code_idx = column(&self.code_column)?;
        let year_idx = column(&self.year_column)?;

        let metric_columns: Vec<(String, usize)> = match &self.metrics {
            Some(metrics) => metrics
                .iter()
                .map(|m| column(m).map(|idx| (m.clone(), idx)))
                .collect::<Result<_>>()?,
            None => headers
                .iter()
                .enumerate()
                .filter(|(idx, _)| ![entity_idx, code_idx, year_idx].contains(idx))
                .map(|(idx, name)| (name.trim().to_string(), idx))
                .collect(),
        };

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let field = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");

            let entity = field(entity_idx);
            if entity.is_empty() {
                dropped += 1;
                continue;
            }

            let raw_year = field(year_idx);
            let year = parse_year(raw_year).ok_or_else(|| DataError::Parse {
                line,
                message: format!("invalid year '{}'", raw_year),
            })?;
            if let Some((min, max)) = self.year_range {
                if year < min || year > max {
                    continue;
                }
            }

            let code = Some(field(code_idx))
                .filter(|c| !c.is_empty())
                .map(str::to_string);
            if code.is_none() && self.drop_uncoded {
                dropped += 1;
                continue;
            }

            let values = metric_columns
                .iter()
                .map(|(_, idx)| parse_value(field(*idx)))
                .collect();

            rows.push(PanelRow {
                entity: entity.to_string(),
                code,
                year,
                values,
            });
        }

        tracing::debug!(rows = rows.len(), dropped, "loaded panel");
        let metrics = metric_columns.into_iter().map(|(name, _)| name).collect();
        Ok(Panel::new(metrics, rows))
    }
}

impl PanelSource for CsvPanelSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<Panel> {
        let file = File::open(&self.path)?;
        self.load_from_reader(file)
    }
}

fn csv_error(err: csv::Error) -> DataError {
    DataError::Csv(err.to_string())
}

/// Years may be written as floats (`2001.0`) by dataframe exports
fn parse_year(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|y| y.fract() == 0.0)
            .filter(|y| (i32::MIN as f64..=i32::MAX as f64).contains(y))
            .map(|y| y as i32)
    })
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
country,year,iso_code,co2,gdp
France,2000,FRA,400.1,1.5e12
France,2001,FRA,,1.6e12
Africa,2000,,1300.0,
Chad,2000,TCD,0.4,NaN
Chad,1999,TCD,0.3,
";

    #[test]
    fn test_load_from_reader() {
        let panel = CsvPanelSource::new("unused.csv")
            .load_from_reader(SAMPLE.as_bytes())
            .unwrap();

        assert_eq!(panel.metrics(), &["co2".to_string(), "gdp".to_string()]);
        assert_eq!(panel.len(), 4);
        assert_eq!(panel.entities(), vec!["Chad", "France"]);

        let france = panel.series("France", "co2").unwrap();
        assert_eq!(france.values, vec![Some(400.1), None]);

        let chad_gdp = panel.series("Chad", "gdp").unwrap();
        assert_eq!(chad_gdp.present_count(), 0);
    }

    #[test]
    fn test_keep_uncoded_rows() {
        let panel = CsvPanelSource::new("unused.csv")
            .keep_uncoded()
            .load_from_reader(SAMPLE.as_bytes())
            .unwrap();
        assert!(panel.entities().contains(&"Africa"));
        assert_eq!(panel.code_for("Africa"), None);
    }

    #[test]
    fn test_year_range() {
        let panel = CsvPanelSource::new("unused.csv")
            .with_year_range(2000, 2022)
            .load_from_reader(SAMPLE.as_bytes())
            .unwrap();
        assert!(panel.rows().iter().all(|r| r.year >= 2000));
    }

    #[test]
    fn test_selected_metrics() {
        let panel = CsvPanelSource::new("unused.csv")
            .with_metrics(vec!["gdp".to_string()])
            .load_from_reader(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(panel.metrics(), &["gdp".to_string()]);
        assert!(panel.series("France", "co2").is_err());
    }

    #[test]
    fn test_missing_metric_column() {
        let err = CsvPanelSource::new("unused.csv")
            .with_metrics(vec!["methane".to_string()])
            .load_from_reader(SAMPLE.as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == "methane"));
    }

    #[test]
    fn test_missing_key_column() {
        let err = CsvPanelSource::new("unused.csv")
            .load_from_reader("country,year,co2\nFrance,2000,1.0\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == "iso_code"));
    }

    #[test]
    fn test_bad_year() {
        let err = CsvPanelSource::new("unused.csv")
            .load_from_reader("country,year,iso_code,co2\nFrance,soon,FRA,1.0\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_float_years() {
        assert_eq!(parse_year("2001.0"), Some(2001));
        assert_eq!(parse_year("2001.5"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_out_of_range_years_rejected() {
        assert_eq!(parse_year("1e12"), None);
        assert_eq!(parse_year("-3e10"), None);
        assert_eq!(parse_year("inf"), None);
        assert_eq!(parse_year("NaN"), None);
        assert_eq!(parse_year("2147483647.0"), Some(i32::MAX));

        let err = CsvPanelSource::new("unused.csv")
            .load_from_reader("country,year,iso_code,co2\nFrance,2000,FRA,1.0\nFrance,1e12,FRA,2.0\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 3, ref message } if message.contains("1e12")));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvPanelSource::new(file.path());
        assert_eq!(source.name(), "csv");
        assert_eq!(source.load().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_file() {
        let err = CsvPanelSource::new("/nonexistent/owid-co2-data.csv").load().unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}

//! Persisted forecast row format.

use forecast_facade::ForecastRow;
use serde::{Deserialize, Serialize};

/// One row of a `forecasts_<metric>.csv` table.
///
/// Column names follow the dashboard's table: `year, y, y_pred, y_lower,
/// y_upper, country, iso_code, metric`. Missing values are empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub year: i32,
    #[serde(rename = "y")]
    pub observed: Option<f64>,
    #[serde(rename = "y_pred")]
    pub forecast: Option<f64>,
    #[serde(rename = "y_lower")]
    pub lower: Option<f64>,
    #[serde(rename = "y_upper")]
    pub upper: Option<f64>,
    #[serde(rename = "country")]
    pub entity: String,
    pub iso_code: Option<String>,
    pub metric: String,
}

impl ForecastRecord {
    pub fn from_row(row: &ForecastRow, entity: &str, iso_code: Option<&str>, metric: &str) -> Self {
        Self {
            year: row.year,
            observed: row.observed,
            forecast: row.forecast,
            lower: row.lower,
            upper: row.upper,
            entity: entity.to_string(),
            iso_code: iso_code.map(str::to_string),
            metric: metric.to_string(),
        }
    }

    /// The table row without its identifiers
    pub fn to_row(&self) -> ForecastRow {
        ForecastRow {
            year: self.year,
            observed: self.observed,
            forecast: self.forecast,
            lower: self.lower,
            upper: self.upper,
        }
    }

    pub fn is_forecast(&self) -> bool {
        self.forecast.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_header_and_empty_cells() {
        let record = ForecastRecord::from_row(
            &ForecastRow::projected(2025, 10.0, 9.0, 11.0),
            "Chile",
            Some("CHL"),
            "co2",
        );

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("year,y,y_pred,y_lower,y_upper,country,iso_code,metric")
        );
        assert_eq!(lines.next(), Some("2025,,10.0,9.0,11.0,Chile,CHL,co2"));
    }

    #[test]
    fn test_read_empty_cells_as_missing() {
        let text = "year,y,y_pred,y_lower,y_upper,country,iso_code,metric\n\
                    2019,3.5,,,,World (total),GLOBAL,co2\n\
                    2020,,4.0,3.6,4.4,Kosovo,,co2\n";
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let records: Vec<ForecastRecord> = reader.deserialize().map(|r| r.unwrap()).collect();

        assert_eq!(records[0].observed, Some(3.5));
        assert!(!records[0].is_forecast());
        assert_eq!(records[1].iso_code, None);
        assert_eq!(records[1].to_row(), ForecastRow::projected(2020, 4.0, 3.6, 4.4));
    }
}

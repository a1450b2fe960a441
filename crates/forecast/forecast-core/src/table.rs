//! Forecast table assembly

use forecast_spi::{FitOutcome, ForecastRow, ForecastTable, YearSeries};
use std::collections::BTreeMap;

/// Merge the history of `series` with the projected `horizon` years.
///
/// Every input year keeps a history row, missing values included. Horizon
/// years are strictly after the last non-missing year, so a horizon year can
/// only coincide with a missing history row, which then becomes a forecast
/// row with no observation.
pub fn assemble(series: &YearSeries, horizon: &[i32], outcome: &FitOutcome) -> ForecastTable {
    let mut rows: BTreeMap<i32, ForecastRow> = series
        .iter()
        .map(|(year, value)| (year, ForecastRow::history(year, value)))
        .collect();

    let interval = outcome.interval();
    for (&year, (forecast, lower, upper)) in horizon.iter().zip(interval.steps()) {
        let row = rows
            .entry(year)
            .or_insert_with(|| ForecastRow::history(year, None));
        debug_assert!(row.observed.is_none());
        *row = ForecastRow::projected(year, forecast, lower, upper);
    }

    ForecastTable::new(
        rows.into_values().collect(),
        outcome.method(),
        interval.confidence_level,
    )
}

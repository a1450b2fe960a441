//! Standalone Plotly chart per entity.

use crate::error::Result;
use forecast_facade::ForecastTable;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// File stem for an entity name: alphanumerics, `-` and `_` kept, the rest
/// replaced by `_`.
pub fn safe_filename(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    safe.trim().to_string()
}

/// Self-contained HTML page with the observed line, the forecast line and the
/// shaded confidence band.
pub fn render_chart(entity: &str, metric: &str, table: &ForecastTable) -> Result<String> {
    let (hist_x, hist_y): (Vec<i32>, Vec<f64>) = table
        .history()
        .filter_map(|r| r.observed.map(|y| (r.year, y)))
        .unzip();

    let forecasts: Vec<_> = table.forecasts().collect();
    let fx: Vec<i32> = forecasts.iter().map(|r| r.year).collect();
    let fy: Vec<Option<f64>> = forecasts.iter().map(|r| r.forecast).collect();
    let lower: Vec<Option<f64>> = forecasts.iter().map(|r| r.lower).collect();
    let upper: Vec<Option<f64>> = forecasts.iter().map(|r| r.upper).collect();
    let band = format!("{:.0}% CI", table.confidence_level() * 100.0);

    let data = json!([
        {
            "x": hist_x, "y": hist_y, "mode": "lines+markers", "name": "Observed",
            "line": { "color": "#1f77b4" }
        },
        {
            "x": fx, "y": fy, "mode": "lines+markers", "name": "Forecast",
            "line": { "color": "#ff7f0e", "dash": "dash" }
        },
        {
            "x": fx, "y": lower, "mode": "lines", "name": "lower",
            "line": { "width": 0 }, "showlegend": false
        },
        {
            "x": fx, "y": upper, "mode": "lines", "name": band,
            "line": { "width": 0 }, "fill": "tonexty",
            "fillcolor": "rgba(255,127,14,0.2)"
        }
    ]);
    let title = format!("{} forecast for {} ({})", metric, entity, table.method());
    let layout = json!({
        "title": title,
        "xaxis": { "title": "Year" },
        "yaxis": { "title": metric }
    });

    Ok(format!(
        concat!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
            "<title>{title}</title>\n<script src=\"{cdn}\"></script>\n</head>\n<body>\n",
            "<div id=\"chart\" style=\"width:100%;height:100%;\"></div>\n",
            "<script>Plotly.newPlot(\"chart\", {data}, {layout});</script>\n",
            "</body>\n</html>\n"
        ),
        title = escape_html(&title),
        cdn = PLOTLY_CDN,
        data = script_safe(serde_json::to_string(&data)?),
        layout = script_safe(serde_json::to_string(&layout)?),
    ))
}

/// Render and write `<dir>/<safe_name>.html`
pub fn write_chart(dir: &Path, entity: &str, metric: &str, table: &ForecastTable) -> Result<PathBuf> {
    let html = render_chart(entity, metric, table)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.html", safe_filename(entity)));
    fs::write(&path, html)?;
    Ok(path)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// JSON inside <script> must not close the tag early.
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_facade::{ForecastMethod, ForecastRow};

    fn table() -> ForecastTable {
        ForecastTable::new(
            vec![
                ForecastRow::history(2019, Some(1.0)),
                ForecastRow::history(2020, None),
                ForecastRow::projected(2021, 1.1, 0.9, 1.3),
            ],
            ForecastMethod::Model("ARIMA(1,1,1)".to_string()),
            0.95,
        )
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("Côte d'Ivoire"), "Côte_d_Ivoire");
        assert_eq!(safe_filename("World (total)"), "World__total_");
        assert_eq!(safe_filename("Guinea-Bissau"), "Guinea-Bissau");
    }

    #[test]
    fn test_render_chart() {
        let html = render_chart("Chile", "co2", &table()).unwrap();
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("co2 forecast for Chile (ARIMA(1,1,1))"));
        assert!(html.contains("\"dash\":\"dash\""));
        assert!(html.contains("95% CI"));
        assert!(html.contains("[2019]"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let html = render_chart("</script><b>", "co2", &table()).unwrap();
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("&lt;/script&gt;&lt;b&gt;"));
    }

    #[test]
    fn test_write_chart() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_chart(&dir.path().join("co2"), "South Africa", "co2", &table()).unwrap();
        assert_eq!(path.file_name().unwrap(), "South_Africa.html");
        assert!(fs::read_to_string(path).unwrap().starts_with("<!DOCTYPE html>"));
    }
}

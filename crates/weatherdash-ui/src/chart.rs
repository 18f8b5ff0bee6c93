//! Line chart model and a plain-text renderer.

use weatherdash_weather::{Datum, HistorySeries};

pub const HISTORY_DATASET_LABEL: &str = "Average Temperature (°C)";

/// One named series of values, aligned with the chart labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Datum>,
}

/// What a chart backend needs: x-axis labels and one or more series.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub labels: Vec<Datum>,
    pub datasets: Vec<Dataset>,
}

impl LineChart {
    /// Chart for a history series, in service order. Points without a
    /// partner in the other array are left out.
    pub fn from_history(series: &HistorySeries) -> Self {
        let (labels, data) = series
            .points()
            .map(|(label, value)| (label.clone(), value.clone()))
            .unzip();
        Self {
            labels,
            datasets: vec![Dataset {
                label: HISTORY_DATASET_LABEL.to_string(),
                data,
            }],
        }
    }
}

/// Charting capability.
pub trait ChartRenderer {
    fn render(&self, chart: &LineChart) -> String;
}

/// Renders each dataset as horizontal bars, one row per label.
#[derive(Debug, Clone)]
pub struct TextChart {
    /// Width of the longest bar in characters
    pub width: usize,
}

impl Default for TextChart {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl TextChart {
    fn bar_len(&self, value: f64, min: f64, max: f64) -> usize {
        let width = self.width.max(1);
        if max <= min {
            return width;
        }
        let scaled = (value - min) / (max - min) * (width - 1) as f64;
        1 + scaled.round() as usize
    }
}

impl ChartRenderer for TextChart {
    fn render(&self, chart: &LineChart) -> String {
        let labels: Vec<String> = chart.labels.iter().map(|l| l.to_string()).collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut out = String::new();

        for dataset in &chart.datasets {
            out.push_str(&dataset.label);
            out.push('\n');

            let numeric: Vec<f64> = dataset.data.iter().filter_map(Datum::as_f64).collect();
            let min = numeric.iter().copied().fold(f64::INFINITY, f64::min);
            let max = numeric.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            for (label, value) in labels.iter().zip(dataset.data.iter()) {
                let bar = match value.as_f64() {
                    Some(v) => "█".repeat(self.bar_len(v, min, max)),
                    None => "?".to_string(),
                };
                out.push_str(&format!(
                    "{:>width$} | {} {}\n",
                    label,
                    bar,
                    value,
                    width = label_width
                ));
            }
        }

        out
    }
}

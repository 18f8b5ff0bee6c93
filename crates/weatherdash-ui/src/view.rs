//! Presentation of a [`DashboardState`].

use weatherdash_weather::Reading;

use crate::chart::{ChartRenderer, LineChart};
use crate::state::DashboardState;

pub const NOT_AVAILABLE: &str = "N/A";
pub const PAUSE_LABEL: &str = "Pause";
pub const PLAY_LABEL: &str = "Play";
pub const SAVE_LABEL: &str = "Save Current Temperature";
pub const FETCH_RECENT_LABEL: &str = "Obtain Recent Readings";
pub const RECENT_HEADING: &str = "Recent Temperature Readings";
pub const NO_RECENT: &str = "No recent readings available.";
pub const HISTORY_HEADING: &str = "Average Temperature History (Last 5 Days)";
pub const HISTORY_LOADING: &str = "Loading temperature history...";

#[derive(Debug, Clone, PartialEq)]
pub enum RecentView {
    Readings(Vec<String>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Chart(LineChart),
    Loading,
}

/// Everything on screen, as text.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub heading: String,
    pub temperature: String,
    pub timestamp: String,
    pub toggle_label: &'static str,
    pub recent: RecentView,
    pub history: HistoryView,
}

fn format_temperature(temperature: f64) -> String {
    format!("{}°C", temperature)
}

fn format_reading(reading: &Reading) -> String {
    let temperature = reading
        .temperature
        .map(format_temperature)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let timestamp = reading.timestamp.as_deref().unwrap_or(NOT_AVAILABLE);
    format!("{} at {}", temperature, timestamp)
}

impl DashboardView {
    pub fn build(heading: &str, state: &DashboardState) -> Self {
        let current = state.current.as_ref();

        let temperature = current
            .and_then(|r| r.temperature)
            .map(format_temperature)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let timestamp = current
            .and_then(|r| r.timestamp.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let recent = if state.recent.is_empty() {
            RecentView::Empty
        } else {
            RecentView::Readings(state.recent.iter().map(format_reading).collect())
        };

        let history = match &state.history {
            Some(series) => HistoryView::Chart(LineChart::from_history(series)),
            None => HistoryView::Loading,
        };

        Self {
            heading: heading.to_string(),
            temperature,
            timestamp,
            toggle_label: if state.running { PAUSE_LABEL } else { PLAY_LABEL },
            recent,
            history,
        }
    }

    pub fn render(&self, chart: &dyn ChartRenderer) -> String {
        let mut out = String::new();

        out.push_str(&format!("{}\n\n", self.heading));
        out.push_str(&format!("Current Temperature: {}\n", self.temperature));
        out.push_str(&format!("Timestamp: {}\n\n", self.timestamp));
        out.push_str(&format!(
            "[{}] [{}] [{}]\n\n",
            self.toggle_label, SAVE_LABEL, FETCH_RECENT_LABEL
        ));

        out.push_str(&format!("{}\n", RECENT_HEADING));
        match &self.recent {
            RecentView::Readings(lines) => {
                for line in lines {
                    out.push_str(&format!("{}\n", line));
                }
            }
            RecentView::Empty => out.push_str(&format!("{}\n", NO_RECENT)),
        }

        out.push_str(&format!("\n{}\n", HISTORY_HEADING));
        match &self.history {
            HistoryView::Chart(line_chart) => out.push_str(&chart.render(line_chart)),
            HistoryView::Loading => out.push_str(&format!("{}\n", HISTORY_LOADING)),
        }

        out
    }
}

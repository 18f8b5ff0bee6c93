//! Dashboard state and the transitions that change it.

use weatherdash_weather::{HistorySeries, Reading, SavePayload};

use crate::gate::{Generation, RequestGate};

/// Independently refreshed parts of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Current,
    Recent,
    History,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    /// Latest reading; `None` until the first successful fetch.
    pub current: Option<Reading>,
    /// Recent saved readings. Empty both before the first fetch and when the
    /// service has none.
    pub recent: Vec<Reading>,
    /// Daily history; `None` until the first successful fetch.
    pub history: Option<HistorySeries>,
    /// Whether auto-refresh is armed.
    pub running: bool,
}

impl DashboardState {
    pub fn new(running: bool) -> Self {
        Self {
            current: None,
            recent: Vec::new(),
            history: None,
            running,
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(true)
    }
}

/// A completed remote result or a user transition.
///
/// Failures never become actions: a failed call leaves state untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CurrentLoaded {
        generation: Generation,
        reading: Reading,
    },
    RecentLoaded {
        generation: Generation,
        readings: Vec<Reading>,
    },
    HistoryLoaded {
        generation: Generation,
        series: HistorySeries,
    },
    ToggleRunning,
}

/// State plus the per-slot request gates.
#[derive(Debug, Default)]
pub struct DashboardStore {
    state: DashboardState,
    current_gate: RequestGate,
    recent_gate: RequestGate,
    history_gate: RequestGate,
}

impl DashboardStore {
    pub fn new(running: bool) -> Self {
        Self {
            state: DashboardState::new(running),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Stamp a new request for `slot`.
    pub fn issue(&mut self, slot: Slot) -> Generation {
        self.gate_mut(slot).issue()
    }

    /// Apply `action`. Returns false when it was dropped as stale.
    ///
    /// Each slot is replaced wholesale by the newest-issued response that has
    /// arrived so far; responses for different slots never interact.
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::CurrentLoaded {
                generation,
                reading,
            } => {
                if !self.current_gate.admit(generation) {
                    return false;
                }
                self.state.current = Some(reading);
            }
            Action::RecentLoaded {
                generation,
                readings,
            } => {
                if !self.recent_gate.admit(generation) {
                    return false;
                }
                self.state.recent = readings;
            }
            Action::HistoryLoaded { generation, series } => {
                if !self.history_gate.admit(generation) {
                    return false;
                }
                self.state.history = Some(series);
            }
            Action::ToggleRunning => {
                self.state.running = !self.state.running;
            }
        }
        true
    }

    /// Body for `save`, taken from the reading currently held.
    pub fn save_payload(&self) -> SavePayload {
        self.state
            .current
            .as_ref()
            .map(SavePayload::from)
            .unwrap_or_default()
    }

    fn gate_mut(&mut self, slot: Slot) -> &mut RequestGate {
        match slot {
            Slot::Current => &mut self.current_gate,
            Slot::Recent => &mut self.recent_gate,
            Slot::History => &mut self.history_gate,
        }
    }
}

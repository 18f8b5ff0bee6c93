//! The dashboard event loop and its handle.
//!
//! Lifecycle:
//! - mount: one fetch cycle (current + history), then arm the refresh timer
//!   if running
//! - tick: one fetch cycle
//! - pause: cancel the timer; in-flight fetches still commit
//! - resume: one immediate fetch cycle, then re-arm (missed ticks are not
//!   replayed)
//! - unmount: cancel the timer and stop; nothing is fetched afterwards

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use weatherdash_core::DashboardConfig;
use weatherdash_weather::WeatherClient;

use crate::error_mapping::log_remote_failure;
use crate::scheduler::RefreshScheduler;
use crate::services::{self, DashboardEvent};
use crate::state::{Action, DashboardState, DashboardStore, Slot};

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub refresh_interval: Duration,
    pub start_running: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            start_running: true,
        }
    }
}

impl From<&DashboardConfig> for DashboardSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            refresh_interval: Duration::from_secs(config.refresh_seconds),
            start_running: config.start_running,
        }
    }
}

#[derive(Debug)]
enum Command {
    ToggleRunning,
    SaveCurrent,
    FetchRecent,
    Unmount,
}

/// Control surface of a mounted dashboard.
///
/// Dropping the handle unmounts the dashboard.
#[derive(Debug)]
pub struct DashboardHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<DashboardState>,
    task: JoinHandle<()>,
}

impl DashboardHandle {
    fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Pause or resume auto-refresh. Returns false if the dashboard is gone.
    pub fn toggle_running(&self) -> bool {
        self.send(Command::ToggleRunning)
    }

    /// Save the reading currently shown.
    pub fn save_current(&self) -> bool {
        self.send(Command::SaveCurrent)
    }

    /// Fetch the recent saved readings.
    pub fn fetch_recent(&self) -> bool {
        self.send(Command::FetchRecent)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> DashboardState {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.snapshot.clone()
    }

    /// Stop the dashboard and wait for its loop to exit.
    pub async fn unmount(self) {
        let _ = self.commands.send(Command::Unmount);
        if let Err(e) = self.task.await {
            tracing::error!("Dashboard loop ended abnormally: {}", e);
        }
    }
}

pub struct Dashboard {
    client: Arc<dyn WeatherClient>,
    store: DashboardStore,
    scheduler: RefreshScheduler,
    events_tx: mpsc::UnboundedSender<DashboardEvent>,
    events_rx: mpsc::UnboundedReceiver<DashboardEvent>,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshot: watch::Sender<DashboardState>,
}

impl Dashboard {
    /// Start the dashboard loop on the current tokio runtime.
    pub fn mount(client: Arc<dyn WeatherClient>, settings: DashboardSettings) -> DashboardHandle {
        let store = DashboardStore::new(settings.start_running);
        let (snapshot_tx, snapshot_rx) = watch::channel(store.state().clone());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let dashboard = Self {
            client,
            store,
            scheduler: RefreshScheduler::new(settings.refresh_interval),
            events_tx,
            events_rx,
            commands: commands_rx,
            snapshot: snapshot_tx,
        };

        let task = tokio::spawn(dashboard.run());

        DashboardHandle {
            commands: commands_tx,
            snapshot: snapshot_rx,
            task,
        }
    }

    async fn run(mut self) {
        tracing::info!(
            running = self.store.state().running,
            interval_secs = self.scheduler.period().as_secs_f64(),
            "Dashboard mounted"
        );

        self.fetch_cycle();
        if self.store.state().running {
            self.arm();
        }

        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(Command::Unmount) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
            }
        }

        self.scheduler.cancel();
        tracing::info!("Dashboard unmounted");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::ToggleRunning => self.toggle_running(),
            Command::SaveCurrent => {
                let payload = self.store.save_payload();
                tracing::debug!(?payload, "Saving current reading");
                services::request_save(&self.events_tx, self.client.clone(), payload);
            }
            Command::FetchRecent => {
                let generation = self.store.issue(Slot::Recent);
                services::request_recent(&self.events_tx, self.client.clone(), generation);
            }
            Command::Unmount => {}
        }
    }

    fn handle_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Tick { epoch } => {
                if self.scheduler.is_current(epoch) {
                    tracing::debug!(epoch, "Refresh tick");
                    self.fetch_cycle();
                } else {
                    tracing::trace!(epoch, "Ignoring tick from cancelled timer");
                }
            }
            DashboardEvent::CurrentDone { generation, result } => match result {
                Ok(reading) => self.commit(Action::CurrentLoaded { generation, reading }),
                Err(e) => log_remote_failure("fetching weather", e),
            },
            DashboardEvent::RecentDone { generation, result } => match result {
                Ok(readings) => self.commit(Action::RecentLoaded {
                    generation,
                    readings,
                }),
                Err(e) => log_remote_failure("fetching recent readings", e),
            },
            DashboardEvent::HistoryDone { generation, result } => match result {
                Ok(series) => {
                    if !series.is_aligned() {
                        tracing::warn!(
                            temperatures = series.temperature.len(),
                            labels = series.timestamp.len(),
                            "History arrays differ in length; charting the common prefix"
                        );
                    }
                    self.commit(Action::HistoryLoaded { generation, series })
                }
                Err(e) => log_remote_failure("fetching weather history", e),
            },
            DashboardEvent::SaveDone(result) => match result {
                Ok(()) => tracing::debug!("Temperature saved"),
                Err(e) => log_remote_failure("saving temperature", e),
            },
        }
    }

    fn toggle_running(&mut self) {
        self.store.dispatch(Action::ToggleRunning);

        if self.store.state().running {
            tracing::info!("Auto-refresh resumed");
            self.fetch_cycle();
            self.arm();
        } else {
            tracing::info!("Auto-refresh paused");
            self.scheduler.cancel();
        }
        self.publish();
    }

    fn commit(&mut self, action: Action) {
        if self.store.dispatch(action) {
            self.publish();
        } else {
            tracing::debug!("Dropped stale response");
        }
    }

    fn fetch_cycle(&mut self) {
        let current = self.store.issue(Slot::Current);
        services::request_current(&self.events_tx, self.client.clone(), current);

        let history = self.store.issue(Slot::History);
        services::request_history(&self.events_tx, self.client.clone(), history);
    }

    fn arm(&mut self) {
        let tx = self.events_tx.clone();
        self.scheduler
            .arm(move |epoch| tx.send(DashboardEvent::Tick { epoch }).is_ok());
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.store.state().clone());
    }
}

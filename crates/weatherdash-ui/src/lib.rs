//! Weather dashboard: state, refresh scheduling and presentation.
//!
//! The dashboard runs as a single tokio task that owns all state. Remote calls
//! run in spawned tasks and report back over a channel; every state change
//! goes through [`DashboardStore::dispatch`].

pub mod chart;
pub mod dashboard;
pub mod error_mapping;
pub mod gate;
pub mod scheduler;
pub mod services;
pub mod state;
pub mod view;

pub use chart::{ChartRenderer, Dataset, LineChart, TextChart};
pub use dashboard::{Dashboard, DashboardHandle, DashboardSettings};
pub use gate::{Generation, RequestGate};
pub use scheduler::RefreshScheduler;
pub use state::{Action, DashboardState, DashboardStore, Slot};
pub use view::DashboardView;

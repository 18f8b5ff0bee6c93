//! Weather service client for weatherdash
//!
//! Wire types for the remote weather API and the `WeatherClient` capability
//! the dashboard drives, with an HTTP implementation over reqwest.

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpWeatherClient, WeatherClient};
pub use error::ClientError;
pub use types::*;

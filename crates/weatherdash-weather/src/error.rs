//! Remote call failures.

use thiserror::Error;

/// Any failed call against the weather service.
///
/// Callers treat every variant the same way (log and keep prior state); the
/// variants exist so logs say what actually went wrong.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status of the failure, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Status { status, .. } => Some(*status),
            Self::Decode(_) => None,
        }
    }
}

//! Dashboard backend: async remote calls.
//! All network work runs off the dashboard loop; results are sent back via mpsc.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use weatherdash_weather::{ClientError, HistorySeries, Reading, SavePayload, WeatherClient};

use crate::gate::Generation;

/// Messages delivered to the dashboard loop.
#[derive(Debug)]
pub enum DashboardEvent {
    /// The refresh timer armed at `epoch` fired
    Tick { epoch: u64 },
    /// Result of `GET /weather`
    CurrentDone {
        generation: Generation,
        result: Result<Reading, ClientError>,
    },
    /// Result of `GET /recent`
    RecentDone {
        generation: Generation,
        result: Result<Vec<Reading>, ClientError>,
    },
    /// Result of `GET /history`
    HistoryDone {
        generation: Generation,
        result: Result<HistorySeries, ClientError>,
    },
    /// Result of `POST /save`
    SaveDone(Result<(), ClientError>),
}

/// Fetch the current reading. Sends `CurrentDone` when complete.
pub fn request_current(
    tx: &UnboundedSender<DashboardEvent>,
    client: Arc<dyn WeatherClient>,
    generation: Generation,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.get_current().await;
        let _ = tx.send(DashboardEvent::CurrentDone { generation, result });
    });
}

/// Fetch recent saved readings. Sends `RecentDone` when complete.
pub fn request_recent(
    tx: &UnboundedSender<DashboardEvent>,
    client: Arc<dyn WeatherClient>,
    generation: Generation,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.get_recent().await;
        let _ = tx.send(DashboardEvent::RecentDone { generation, result });
    });
}

/// Fetch the history series. Sends `HistoryDone` when complete.
pub fn request_history(
    tx: &UnboundedSender<DashboardEvent>,
    client: Arc<dyn WeatherClient>,
    generation: Generation,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.get_history().await;
        let _ = tx.send(DashboardEvent::HistoryDone { generation, result });
    });
}

/// Persist `payload`. Sends `SaveDone` when complete.
pub fn request_save(
    tx: &UnboundedSender<DashboardEvent>,
    client: Arc<dyn WeatherClient>,
    payload: SavePayload,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.save(&payload).await;
        let _ = tx.send(DashboardEvent::SaveDone(result));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::RequestGate;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl WeatherClient for Unreachable {
        async fn get_current(&self) -> Result<Reading, ClientError> {
            Err(ClientError::Decode("offline".into()))
        }
        async fn get_recent(&self) -> Result<Vec<Reading>, ClientError> {
            Ok(Vec::new())
        }
        async fn get_history(&self) -> Result<HistorySeries, ClientError> {
            Ok(HistorySeries::default())
        }
        async fn save(&self, _payload: &SavePayload) -> Result<(), ClientError> {
            Err(ClientError::Status {
                status: 503,
                body: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_current_result_carries_generation() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut gate = RequestGate::new();
        let generation = gate.issue();

        request_current(&tx, Arc::new(Unreachable), generation);

        match rx.recv().await {
            Some(DashboardEvent::CurrentDone {
                generation: got,
                result,
            }) => {
                assert_eq!(got, generation);
                assert!(result.is_err());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        request_save(&tx, Arc::new(Unreachable), SavePayload::default());

        assert!(matches!(
            rx.recv().await,
            Some(DashboardEvent::SaveDone(Err(ClientError::Status { status: 503, .. })))
        ));
    }

    #[tokio::test]
    async fn test_closed_channel_is_ignored() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let mut gate = RequestGate::new();

        request_history(&tx, Arc::new(Unreachable), gate.issue());
        tokio::task::yield_now().await;
    }
}

//! Weather service API client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use crate::error::ClientError;
use crate::types::{HistorySeries, Reading, SavePayload};

/// The remote operations the dashboard depends on.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// `GET /weather`
    async fn get_current(&self) -> Result<Reading, ClientError>;

    /// `GET /recent`
    async fn get_recent(&self) -> Result<Vec<Reading>, ClientError>;

    /// `GET /history`
    async fn get_history(&self) -> Result<HistorySeries, ClientError>;

    /// `POST /save`. The response body is ignored.
    async fn save(&self, payload: &SavePayload) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWeatherClient {
    /// Create a client for the service at `base_url`.
    ///
    /// `timeout` of `None` leaves requests unbounded; a hung call then just
    /// never reports back.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.client.get(self.endpoint(path)).send().await?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl WeatherClient for HttpWeatherClient {
    #[instrument(skip(self), level = "debug")]
    async fn get_current(&self) -> Result<Reading, ClientError> {
        self.get_json("/weather").await
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_recent(&self) -> Result<Vec<Reading>, ClientError> {
        self.get_json("/recent").await
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_history(&self) -> Result<HistorySeries, ClientError> {
        self.get_json("/history").await
    }

    #[instrument(skip(self), level = "debug")]
    async fn save(&self, payload: &SavePayload) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.endpoint("/save"))
            .json(payload)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

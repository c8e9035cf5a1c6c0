//! HTTP client for the detection backend.

use crate::config::DashboardConfig;
use crate::model::{Incident, Metrics, StageUpdate, TriggerResult};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, aborted fetch).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// The four backend operations the dashboard depends on.
#[allow(async_fn_in_trait)]
pub trait IncidentApi {
    async fn list_incidents(&self) -> Result<Vec<Incident>, ApiError>;
    async fn fetch_metrics(&self) -> Result<Metrics, ApiError>;
    async fn update_stage(&self, id: &str, update: &StageUpdate) -> Result<(), ApiError>;
    async fn trigger_detection(&self) -> Result<TriggerResult, ApiError>;
}

/// No retries and no timeouts: the next poll is the retry.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(&config.api_base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.http.get(self.url(path)))
            .await?
            .json::<T>()
            .await
            .map_err(ApiError::Decode)
    }
}

impl IncidentApi for ApiClient {
    async fn list_incidents(&self) -> Result<Vec<Incident>, ApiError> {
        self.get_json("/incidents").await
    }

    async fn fetch_metrics(&self) -> Result<Metrics, ApiError> {
        self.get_json("/metrics").await
    }

    async fn update_stage(&self, id: &str, update: &StageUpdate) -> Result<(), ApiError> {
        let url = self.url(&format!("/incidents/{id}/update-stage"));
        self.send(self.http.put(url).json(update)).await?;
        Ok(())
    }

    async fn trigger_detection(&self) -> Result<TriggerResult, ApiError> {
        self.send(self.http.post(self.url("/run-detection")))
            .await?
            .json::<TriggerResult>()
            .await
            .map_err(ApiError::Decode)
    }
}

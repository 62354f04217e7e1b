//! HTTP implementation of [`AnalysisBackend`] over reqwest.

use async_trait::async_trait;
use cropagent_core::backend::AnalysisBackend;
use cropagent_core::config::DashboardConfig;
use cropagent_core::error::{CropAgentError, Result};
use cropagent_core::region::Region;
use cropagent_core::report::{
    AnalysisRequest, AnalysisResponse, CropsResponse, HealthStatus, HistoryResponse, SoilResponse,
    SoilSnapshot, StatesResponse, WeatherResponse, WeatherSnapshot,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Filters for `GET /api/history`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    pub region: Option<String>,
    pub crop: Option<String>,
    pub limit: Option<u32>,
}

/// Client for the crop analysis REST API.
#[derive(Debug, Clone)]
pub struct HttpAnalysisBackend {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpAnalysisBackend {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            CropAgentError::config(format!("Invalid api_base_url '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(CropAgentError::config(format!(
                "api_base_url must be an http(s) URL: {}",
                base_url
            )));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL, percent-encoding each path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CropAgentError::config(format!("Not a base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::read_json(response).await
    }

    fn map_send_error(&self, err: reqwest::Error) -> CropAgentError {
        if err.is_timeout() {
            CropAgentError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            err.into()
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!("[HttpAnalysisBackend] {} -> {}", status, message);
            return Err(CropAgentError::http_status(status.as_u16(), message));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!("[HttpAnalysisBackend] GET {}", url);
        self.send(self.client.get(url)).await
    }

    /// `GET /api/states`: the backend's region catalog.
    pub async fn states(&self) -> Result<Vec<Region>> {
        let response: StatesResponse = self.get(&["api", "states"]).await?;
        Ok(response.states)
    }

    /// `GET /api/crops/{state}`
    pub async fn crops(&self, region: &str) -> Result<Vec<String>> {
        let response: CropsResponse = self.get(&["api", "crops", region]).await?;
        Ok(response.crops)
    }

    /// `GET /api/history`: most recent stored predictions, newest first.
    pub async fn history(&self, query: &HistoryQuery) -> Result<HistoryResponse> {
        let url = self.endpoint(&["api", "history"])?;
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(region) = &query.region {
            params.push(("state", region.clone()));
        }
        if let Some(crop) = &query.crop {
            params.push(("crop", crop.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        self.send(self.client.get(url).query(&params)).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get(&["health"]).await
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        let url = self.endpoint(&["api", "chat"])?;
        tracing::debug!(
            "[HttpAnalysisBackend] POST {} (state={:?}, crop={:?}, language={})",
            url,
            request.state,
            request.crop,
            request.language
        );

        let response: AnalysisResponse = self.send(self.client.post(url).json(request)).await?;
        if !response.success {
            let message = response
                .error
                .clone()
                .unwrap_or_else(|| "Backend reported failure".to_string());
            return Err(CropAgentError::transport(message));
        }
        Ok(response)
    }

    async fn weather(&self, region: &str) -> Result<WeatherSnapshot> {
        let response: WeatherResponse = self.get(&["api", "weather", region]).await?;
        Ok(response.weather)
    }

    async fn soil(&self, region: &str, crop: &str) -> Result<SoilSnapshot> {
        let response: SoilResponse = self.get(&["api", "soil", region, crop]).await?;
        Ok(response.soil)
    }
}

/// Extracts the failure reason from an error body.
///
/// The backend reports errors as `{"detail": ...}`; validation errors carry
/// a list there instead of a string.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(text)) => text,
        Some(other) => other.to_string(),
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

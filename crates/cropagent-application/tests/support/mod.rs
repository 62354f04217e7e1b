//! Scripted in-memory backend for race scenarios.
//!
//! Every `analyze` call is recorded and parked on a oneshot channel until
//! the test releases it with [`ScriptedBackend::reply`], so tests decide the
//! completion order explicitly.

#![allow(dead_code)]

use async_trait::async_trait;
use cropagent_core::backend::AnalysisBackend;
use cropagent_core::error::{CropAgentError, Result};
use cropagent_core::report::{
    AnalysisRequest, AnalysisResponse, SoilSnapshot, WeatherSnapshot,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Responder = Box<dyn Fn(&AnalysisRequest) -> Result<AnalysisResponse> + Send + Sync>;

#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<AnalysisRequest>>,
    pending: Mutex<HashMap<usize, oneshot::Sender<Result<AnalysisResponse>>>>,
    responder: Mutex<Option<Responder>>,
    weather: Mutex<Option<WeatherSnapshot>>,
    soil: Mutex<Option<SoilSnapshot>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answers every call immediately with `responder` instead of parking it.
    pub fn answering(
        responder: impl Fn(&AnalysisRequest) -> Result<AnalysisResponse> + Send + Sync + 'static,
    ) -> Arc<Self> {
        let backend = Self::default();
        *backend.responder.lock().unwrap() = Some(Box::new(responder));
        Arc::new(backend)
    }

    pub fn with_weather(self: Arc<Self>, weather: WeatherSnapshot) -> Arc<Self> {
        *self.weather.lock().unwrap() = Some(weather);
        self
    }

    pub fn with_soil(self: Arc<Self>, soil: SoilSnapshot) -> Arc<Self> {
        *self.soil.lock().unwrap() = Some(soil);
        self
    }

    /// Makes later weather and soil fetches fail.
    pub fn drop_snapshots(&self) {
        *self.weather.lock().unwrap() = None;
        *self.soil.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<AnalysisRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Yields until at least `n` analyze calls have been issued.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.call_count() < n {
            tokio::task::yield_now().await;
        }
    }

    /// Releases the parked call with zero-based `index`.
    pub fn reply(&self, index: usize, result: Result<AnalysisResponse>) {
        let sender = self
            .pending
            .lock()
            .unwrap()
            .remove(&index)
            .unwrap_or_else(|| panic!("no parked call #{index}"));
        let _ = sender.send(result);
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        if let Some(responder) = self.responder.lock().unwrap().as_ref() {
            self.calls.lock().unwrap().push(request.clone());
            return responder(request);
        }

        let receiver = {
            let mut calls = self.calls.lock().unwrap();
            let (sender, receiver) = oneshot::channel();
            self.pending.lock().unwrap().insert(calls.len(), sender);
            calls.push(request.clone());
            receiver
        };
        receiver
            .await
            .unwrap_or_else(|_| Err(CropAgentError::transport("scripted call dropped")))
    }

    async fn weather(&self, _region: &str) -> Result<WeatherSnapshot> {
        self.weather
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CropAgentError::http_status(503, "weather unavailable"))
    }

    async fn soil(&self, _region: &str, _crop: &str) -> Result<SoilSnapshot> {
        self.soil
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CropAgentError::http_status(503, "soil unavailable"))
    }
}

/// A successful response for `region`/`crop` whose report predicts
/// `predicted_yield` and summarizes itself as `summary`.
pub fn response(region: &str, crop: &str, predicted_yield: f64, summary: &str) -> AnalysisResponse {
    serde_json::from_value(serde_json::json!({
        "success": true,
        "state": region,
        "crop": crop,
        "language": "en",
        "response": {
            "summary": {"text": summary},
            "prediction_details": {"yield": {"predicted": predicted_yield, "unit": "tonnes/ha"}},
            "confidence": {"score": 81.0}
        },
        "metadata": {"agents_used": ["weather", "soil", "prediction"]}
    }))
    .expect("valid response fixture")
}

/// A response answering `request` with a summary naming its query.
pub fn echo(request: &AnalysisRequest) -> AnalysisResponse {
    response(
        request.state.as_deref().unwrap_or_default(),
        request.crop.as_deref().unwrap_or_default(),
        3.0,
        &format!("answer: {}", request.query),
    )
}

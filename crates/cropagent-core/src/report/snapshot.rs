//! Payloads of the secondary read-only endpoints.
//!
//! Weather and soil snapshots pre-populate the stat tiles before any chat
//! answer exists; history and health are informational.

use super::null_as_default;
use crate::region::Region;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rainfall {
    pub last_24h: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub datetime: Option<String>,
    pub temperature: Option<f64>,
    pub rain_probability: Option<f64>,
}

/// Partial weather snapshot for one region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: Option<CurrentWeather>,
    pub rainfall: Option<Rainfall>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forecast: Vec<ForecastPoint>,
}

/// `GET /api/weather/{state}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub success: bool,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: WeatherSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilReading {
    pub current: Option<f64>,
    pub status: Option<String>,
}

/// Partial soil snapshot for one region and crop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilSnapshot {
    pub soil_type: Option<String>,
    pub moisture: Option<SoilReading>,
    pub ph: Option<SoilReading>,
    pub health_score: Option<f64>,
}

/// `GET /api/soil/{state}/{crop}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilResponse {
    #[serde(default)]
    pub success: bool,
    pub state: Option<String>,
    pub crop: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub soil: SoilSnapshot,
}

/// Weather and soil snapshots fetched for the current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prefetched {
    pub weather: Option<WeatherSnapshot>,
    pub soil: Option<SoilSnapshot>,
}

impl Prefetched {
    pub fn temperature(&self) -> Option<f64> {
        self.weather.as_ref()?.current.as_ref()?.temperature
    }

    pub fn humidity(&self) -> Option<f64> {
        self.weather.as_ref()?.current.as_ref()?.humidity
    }

    pub fn soil_moisture(&self) -> Option<f64> {
        self.soil.as_ref()?.moisture.as_ref()?.current
    }

    pub fn soil_health(&self) -> Option<f64> {
        self.soil.as_ref()?.health_score
    }
}

/// `GET /api/states`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub states: Vec<Region>,
}

/// `GET /api/crops/{state}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropsResponse {
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crops: Vec<String>,
}

/// One stored prediction as returned by `GET /api/history`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Option<i64>,
    pub timestamp: Option<String>,
    pub state: Option<String>,
    pub crop: Option<String>,
    pub predicted_yield: Option<f64>,
    pub risk_score: Option<f64>,
    pub confidence: Option<f64>,
}

/// `GET /api/history`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub predictions: Vec<PredictionRecord>,
}

/// `GET /health`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: Option<String>,
    pub agents: Option<u32>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

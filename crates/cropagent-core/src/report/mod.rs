//! Report domain module.
//!
//! This module contains the backend's response contract: the aggregated
//! report with its optional sections, the request/response envelope, and
//! the partial snapshots served by the secondary read-only endpoints.
//!
//! # Module Structure
//!
//! - `model`: Aggregated report sections (`AggregatedReport` and friends)
//! - `contract`: Request/response envelope (`AnalysisRequest`, `AnalysisResponse`)
//! - `snapshot`: Weather/soil/history payloads (`WeatherSnapshot`, `SoilSnapshot`, ...)

mod contract;
mod model;
mod snapshot;

pub use contract::{AnalysisRequest, AnalysisResponse, ResponseMetadata};
pub use model::{
    AggregatedReport, AlertItem, ChartsSection, ConfidenceSection, CropHealthCard, Dataset,
    FactorScores, GaugeChart, GaugeThreshold, IrrigationAction, IrrigationAdvice, LabeledValues,
    LineChart, Measurement, NdviReading, NpkSummary, PredictionDetails, Priority, Recommendation,
    RiskAssessment, RiskFactor, SoilCard, StatusValue, SummarySection, WeatherCard, YieldDetails,
    YieldRange,
};
pub use snapshot::{
    CropsResponse, CurrentWeather, ForecastPoint, HealthStatus, HistoryResponse, PredictionRecord,
    Prefetched, Rainfall, SoilReading, SoilResponse, SoilSnapshot, StatesResponse, WeatherResponse,
    WeatherSnapshot,
};

use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

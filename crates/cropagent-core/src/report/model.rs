//! Aggregated report sections.
//!
//! Every section, and nearly every field inside a section, is optional:
//! absence is an expected state and is resolved by the view derivation
//! fallbacks, never reported as an error.

use super::null_as_default;
use serde::{Deserialize, Serialize};

/// The single structured payload returned per analysis request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedReport {
    pub query: Option<String>,
    pub language: Option<String>,
    pub greeting: Option<String>,
    pub summary: Option<SummarySection>,
    pub weather_card: Option<WeatherCard>,
    pub soil_card: Option<SoilCard>,
    pub crop_health_card: Option<CropHealthCard>,
    pub prediction_details: Option<PredictionDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts_formatted: Vec<AlertItem>,
    pub charts: Option<ChartsSection>,
    /// Ordered by priority tier (high first) by the backend.
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<Recommendation>,
    pub irrigation_advice: Option<IrrigationAdvice>,
    pub confidence: Option<ConfidenceSection>,
    pub timestamp: Option<String>,
}

impl AggregatedReport {
    /// Summary text, if present and not blank.
    pub fn summary_text(&self) -> Option<&str> {
        self.summary
            .as_ref()
            .and_then(|s| s.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn yield_details(&self) -> Option<&YieldDetails> {
        self.prediction_details.as_ref()?.yield_details.as_ref()
    }

    pub fn predicted_yield(&self) -> Option<f64> {
        self.yield_details()?.predicted
    }

    pub fn yield_vs_average(&self) -> Option<f64> {
        self.yield_details()?.vs_average
    }

    pub fn risk(&self) -> Option<&RiskAssessment> {
        self.prediction_details.as_ref()?.risk.as_ref()
    }

    pub fn confidence_score(&self) -> Option<f64> {
        self.confidence.as_ref()?.score
    }

    pub fn temperature(&self) -> Option<f64> {
        self.weather_card.as_ref()?.temperature.as_ref()?.value
    }

    pub fn humidity(&self) -> Option<f64> {
        self.weather_card.as_ref()?.humidity.as_ref()?.value
    }

    pub fn soil_moisture(&self) -> Option<f64> {
        self.soil_card.as_ref()?.moisture.as_ref()?.value
    }

    /// Crop health score from the satellite card, falling back to the soil
    /// card's health score.
    pub fn health_score(&self) -> Option<f64> {
        self.crop_health_card
            .as_ref()
            .and_then(|c| c.health_score)
            .or_else(|| self.soil_card.as_ref().and_then(|s| s.health_score))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarySection {
    pub text: Option<String>,
    pub yield_message: Option<String>,
    pub risk_message: Option<String>,
}

/// A numeric reading with unit and preformatted display string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherCard {
    pub title: Option<String>,
    pub temperature: Option<Measurement>,
    pub humidity: Option<Measurement>,
    pub rainfall_24h: Option<Measurement>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// A numeric reading with a qualitative status (`"low"`, `"optimal"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusValue {
    pub value: Option<f64>,
    pub status: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NpkSummary {
    pub nitrogen: Option<String>,
    pub phosphorus: Option<String>,
    pub potassium: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilCard {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub soil_type: Option<String>,
    pub moisture: Option<StatusValue>,
    pub ph: Option<StatusValue>,
    pub health_score: Option<f64>,
    pub npk_summary: Option<NpkSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NdviReading {
    pub value: Option<f64>,
    pub interpretation: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropHealthCard {
    pub title: Option<String>,
    pub ndvi: Option<NdviReading>,
    pub health_score: Option<f64>,
    pub health_status: Option<String>,
    pub growth_stage: Option<String>,
    pub stress_detected: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YieldRange {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YieldDetails {
    pub predicted: Option<f64>,
    pub unit: Option<String>,
    pub range: Option<YieldRange>,
    /// Percent difference against the historical average.
    pub vs_average: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: Option<String>,
    pub impact: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_score: Option<f64>,
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub factors: Vec<RiskFactor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub weather_impact: Option<f64>,
    pub soil_health: Option<f64>,
    pub crop_condition: Option<f64>,
    pub seasonal_favorability: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionDetails {
    #[serde(rename = "yield")]
    pub yield_details: Option<YieldDetails>,
    pub risk: Option<RiskAssessment>,
    pub outlook: Option<String>,
    pub factor_scores: Option<FactorScores>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSection {
    pub score: Option<f64>,
    pub level: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertItem {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub severity: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub action: Option<String>,
}

/// Priority tier of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub action: Option<String>,
    pub impact: Option<String>,
}

/// What the irrigation advisor tells the farmer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrrigationAction {
    Irrigate,
    Skip,
    Wait,
    Monitor,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrrigationAdvice {
    pub action: Option<IrrigationAction>,
    pub urgency: Option<String>,
    pub message: Option<String>,
    pub timing: Option<String>,
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaugeThreshold {
    pub value: Option<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaugeChart {
    pub value: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thresholds: Vec<GaugeThreshold>,
}

/// Labels paired with one value each (radar, bar and doughnut charts).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledValues {
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartsSection {
    pub yield_gauge: Option<GaugeChart>,
    pub factor_scores: Option<LabeledValues>,
    pub weather_forecast: Option<LineChart>,
    pub soil_nutrients: Option<LabeledValues>,
    pub risk_breakdown: Option<LabeledValues>,
}

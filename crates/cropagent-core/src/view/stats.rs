//! Stat tiles: yield, confidence, temperature, soil moisture.

use super::fallback;
use crate::report::{AggregatedReport, Prefetched};
use serde::Serialize;

/// Values shown in the dashboard's stat tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTiles {
    pub yield_value: f64,
    pub yield_unit: String,
    pub yield_vs_average: f64,
    pub confidence: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
}

impl StatTiles {
    /// Tiles rendered when nothing is known yet.
    pub fn fallback() -> Self {
        Self {
            yield_value: fallback::YIELD,
            yield_unit: fallback::YIELD_UNIT.to_string(),
            yield_vs_average: fallback::YIELD_VS_AVERAGE,
            confidence: fallback::CONFIDENCE,
            temperature: fallback::TEMPERATURE,
            humidity: fallback::HUMIDITY,
            soil_moisture: fallback::SOIL_MOISTURE,
        }
    }
}

/// Derives the stat tiles from a report, or the fallback tiles without one.
pub fn derive_stats(report: Option<&AggregatedReport>) -> StatTiles {
    derive_stats_with(report, &Prefetched::default())
}

/// Derives the stat tiles, filling sections the report lacks from the
/// prefetched weather/soil snapshots before using the fallback table.
pub fn derive_stats_with(report: Option<&AggregatedReport>, prefetched: &Prefetched) -> StatTiles {
    let yield_unit = report
        .and_then(|r| r.yield_details())
        .and_then(|y| y.unit.clone())
        .unwrap_or_else(|| fallback::YIELD_UNIT.to_string());

    StatTiles {
        yield_value: report
            .and_then(AggregatedReport::predicted_yield)
            .unwrap_or(fallback::YIELD),
        yield_unit,
        yield_vs_average: report
            .and_then(AggregatedReport::yield_vs_average)
            .unwrap_or(fallback::YIELD_VS_AVERAGE),
        confidence: report
            .and_then(AggregatedReport::confidence_score)
            .unwrap_or(fallback::CONFIDENCE),
        temperature: report
            .and_then(AggregatedReport::temperature)
            .or_else(|| prefetched.temperature())
            .unwrap_or(fallback::TEMPERATURE),
        humidity: report
            .and_then(AggregatedReport::humidity)
            .or_else(|| prefetched.humidity())
            .unwrap_or(fallback::HUMIDITY),
        soil_moisture: report
            .and_then(AggregatedReport::soil_moisture)
            .or_else(|| prefetched.soil_moisture())
            .unwrap_or(fallback::SOIL_MOISTURE),
    }
}

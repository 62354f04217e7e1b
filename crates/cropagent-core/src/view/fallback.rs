//! Fallback table for every dashboard panel.
//!
//! These values are part of the dashboard's observable contract: a panel
//! whose data is missing renders exactly these numbers. Keep every default
//! here so no call site has to guess its own.

/// Yield tile, tonnes per hectare.
pub const YIELD: f64 = 2.8;
pub const YIELD_UNIT: &str = "tonnes/ha";
/// Yield difference against the historical average, percent.
pub const YIELD_VS_AVERAGE: f64 = 0.0;
/// Confidence tile, percent.
pub const CONFIDENCE: f64 = 75.0;
/// Temperature tile, degrees Celsius.
pub const TEMPERATURE: f64 = 28.0;
/// Humidity, percent.
pub const HUMIDITY: f64 = 60.0;
/// Soil moisture tile, percent.
pub const SOIL_MOISTURE: f64 = 55.0;

/// Overall risk score on a 0-100 scale.
pub const RISK_SCORE: f64 = 30.0;
/// Factor reported when the backend lists none.
pub const RISK_FACTOR_NONE: &str = "None Significant";

/// Crop health score on a 0-100 scale (map overlay).
pub const HEALTH_SCORE: f64 = 70.0;

/// Radar chart axes and their default score.
pub const FACTOR_LABELS: [&str; 4] = ["Weather", "Soil", "Crop Health", "Season"];
pub const FACTOR_SCORE: f64 = 70.0;

/// Soil nutrient bars. Phosphorus is scaled ×5 for display (30 → 150).
pub const NUTRIENT_LABELS: [&str; 3] = ["Nitrogen", "Phosphorus", "Potassium"];
pub const NUTRIENTS: [f64; 3] = [200.0, 150.0, 180.0];

/// Yield gauge bounds.
pub const YIELD_GAUGE_MIN: f64 = 0.0;
pub const YIELD_GAUGE_MAX: f64 = 5.0;
pub const HISTORICAL_AVERAGE: f64 = 2.5;

/// Weather forecast chart when no forecast is available: one point.
pub const FORECAST_LABEL: &str = "Today";
pub const FORECAST_TEMPERATURE_LABEL: &str = "Temperature";
pub const FORECAST_RAIN_LABEL: &str = "Rain Probability";
pub const RAIN_PROBABILITY: f64 = 0.0;

pub const COLOR_POOR: &str = "#FF6B6B";
pub const COLOR_FAIR: &str = "#FFD93D";
pub const COLOR_GOOD: &str = "#6BCB77";
pub const COLOR_NEUTRAL: &str = "#888888";

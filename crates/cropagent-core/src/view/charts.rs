//! Chart datasets: yield gauge, factor radar, forecast line, nutrient bars,
//! risk breakdown.

use super::fallback;
use crate::report::{AggregatedReport, ChartsSection, FactorScores, LabeledValues, LineChart};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdBand {
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeSeries {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub thresholds: Vec<ThresholdBand>,
}

/// Labels paired one-to-one with values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub label: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<NamedSeries>,
}

/// Every chart panel's dataset, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub yield_gauge: GaugeSeries,
    pub factor_scores: BarSeries,
    pub weather_forecast: LineSeries,
    pub soil_nutrients: BarSeries,
    pub risk_breakdown: BarSeries,
}

/// Derives all chart datasets from a report, or the fallback datasets
/// without one.
pub fn derive_chart_series(report: Option<&AggregatedReport>) -> ChartSeries {
    let charts = report.and_then(|r| r.charts.as_ref());

    ChartSeries {
        yield_gauge: yield_gauge(report, charts),
        factor_scores: factor_scores(report, charts),
        weather_forecast: weather_forecast(charts.and_then(|c| c.weather_forecast.as_ref())),
        soil_nutrients: charts
            .and_then(|c| c.soil_nutrients.as_ref())
            .filter(|s| !s.labels.is_empty() || !s.values.is_empty())
            .map(|s| pair_up(s, &fallback::NUTRIENT_LABELS, &fallback::NUTRIENTS))
            .unwrap_or_else(|| {
                bars(&fallback::NUTRIENT_LABELS, fallback::NUTRIENTS.to_vec())
            }),
        risk_breakdown: risk_breakdown(report, charts),
    }
}

fn yield_gauge(report: Option<&AggregatedReport>, charts: Option<&ChartsSection>) -> GaugeSeries {
    let gauge = charts.and_then(|c| c.yield_gauge.as_ref());

    let thresholds: Vec<ThresholdBand> = gauge
        .map(|g| {
            g.thresholds
                .iter()
                .filter_map(|t| {
                    Some(ThresholdBand {
                        value: t.value?,
                        color: t
                            .color
                            .clone()
                            .unwrap_or_else(|| fallback::COLOR_NEUTRAL.to_string()),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let thresholds = if thresholds.is_empty() {
        vec![
            band(fallback::HISTORICAL_AVERAGE * 0.8, fallback::COLOR_POOR),
            band(fallback::HISTORICAL_AVERAGE, fallback::COLOR_FAIR),
            band(fallback::YIELD_GAUGE_MAX, fallback::COLOR_GOOD),
        ]
    } else {
        thresholds
    };

    GaugeSeries {
        value: gauge
            .and_then(|g| g.value)
            .or_else(|| report.and_then(AggregatedReport::predicted_yield))
            .unwrap_or(fallback::YIELD),
        min: gauge.and_then(|g| g.min).unwrap_or(fallback::YIELD_GAUGE_MIN),
        max: gauge.and_then(|g| g.max).unwrap_or(fallback::YIELD_GAUGE_MAX),
        thresholds,
    }
}

fn factor_scores(report: Option<&AggregatedReport>, charts: Option<&ChartsSection>) -> BarSeries {
    if let Some(radar) = charts
        .and_then(|c| c.factor_scores.as_ref())
        .filter(|r| !r.values.is_empty())
    {
        return pair_up(radar, &fallback::FACTOR_LABELS, &[fallback::FACTOR_SCORE; 4]);
    }

    let scores = report
        .and_then(|r| r.prediction_details.as_ref())
        .and_then(|p| p.factor_scores.as_ref());
    let FactorScores {
        weather_impact,
        soil_health,
        crop_condition,
        seasonal_favorability,
    } = scores.cloned().unwrap_or_default();

    bars(
        &fallback::FACTOR_LABELS,
        [weather_impact, soil_health, crop_condition, seasonal_favorability]
            .into_iter()
            .map(|v| v.unwrap_or(fallback::FACTOR_SCORE))
            .collect(),
    )
}

fn weather_forecast(chart: Option<&LineChart>) -> LineSeries {
    let Some(chart) = chart.filter(|c| !c.labels.is_empty()) else {
        return LineSeries {
            labels: vec![fallback::FORECAST_LABEL.to_string()],
            datasets: vec![
                NamedSeries {
                    label: fallback::FORECAST_TEMPERATURE_LABEL.to_string(),
                    data: vec![fallback::TEMPERATURE],
                },
                NamedSeries {
                    label: fallback::FORECAST_RAIN_LABEL.to_string(),
                    data: vec![fallback::RAIN_PROBABILITY],
                },
            ],
        };
    };

    let points = chart.labels.len();
    let labels = chart
        .labels
        .iter()
        .enumerate()
        .map(|(i, l)| l.clone().unwrap_or_else(|| format!("#{}", i + 1)))
        .collect();

    let datasets = chart
        .datasets
        .iter()
        .map(|ds| {
            let label = ds.label.clone().unwrap_or_default();
            let default = if label == fallback::FORECAST_TEMPERATURE_LABEL {
                fallback::TEMPERATURE
            } else {
                fallback::RAIN_PROBABILITY
            };
            let data = (0..points)
                .map(|i| ds.data.get(i).copied().flatten().unwrap_or(default))
                .collect();
            NamedSeries { label, data }
        })
        .collect();

    LineSeries { labels, datasets }
}

fn risk_breakdown(report: Option<&AggregatedReport>, charts: Option<&ChartsSection>) -> BarSeries {
    if let Some(chart) = charts
        .and_then(|c| c.risk_breakdown.as_ref())
        .filter(|c| !c.labels.is_empty())
    {
        return pair_up(chart, &[], &[]);
    }

    let factors: Vec<String> = report
        .and_then(AggregatedReport::risk)
        .map(|risk| risk.factors.iter().filter_map(|f| f.factor.clone()).collect())
        .unwrap_or_default();

    if factors.is_empty() {
        return bars(&[fallback::RISK_FACTOR_NONE], vec![1.0]);
    }
    let values = vec![1.0; factors.len()];
    BarSeries {
        labels: factors,
        values,
    }
}

/// Pairs labels with values, filling gaps from the defaults at the same
/// index. Missing defaults become an empty label and a weight of 1.
fn pair_up(source: &LabeledValues, default_labels: &[&str], default_values: &[f64]) -> BarSeries {
    let len = source.labels.len().max(source.values.len());
    let mut labels = Vec::with_capacity(len);
    let mut values = Vec::with_capacity(len);

    for i in 0..len {
        let label = source
            .labels
            .get(i)
            .cloned()
            .flatten()
            .or_else(|| default_labels.get(i).map(|l| l.to_string()))
            .unwrap_or_default();
        let value = source
            .values
            .get(i)
            .copied()
            .flatten()
            .or_else(|| default_values.get(i).copied())
            .unwrap_or(1.0);
        labels.push(label);
        values.push(value);
    }

    BarSeries { labels, values }
}

fn bars(labels: &[&str], values: Vec<f64>) -> BarSeries {
    BarSeries {
        labels: labels.iter().map(|l| l.to_string()).collect(),
        values,
    }
}

fn band(value: f64, color: &str) -> ThresholdBand {
    ThresholdBand {
        value,
        color: color.to_string(),
    }
}

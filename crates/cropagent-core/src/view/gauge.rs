//! Risk gauge: score, level band and contributing factors.

use super::fallback;
use crate::report::AggregatedReport;
use serde::Serialize;
use strum::{Display, EnumString};

/// Risk band of a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 20.0 => Self::Low,
            s if s < 40.0 => Self::Moderate,
            s if s < 60.0 => Self::Elevated,
            s if s < 80.0 => Self::High,
            _ => Self::Critical,
        }
    }

    /// Parses a backend level name, ignoring case and surrounding space.
    pub fn parse(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#00CC00",
            Self::Moderate => "#FFCC00",
            Self::Elevated => "#FF9900",
            Self::High => "#FF6600",
            Self::Critical => "#FF0000",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactorView {
    pub name: String,
    pub impact: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskGauge {
    /// Clamped to 0..=100.
    pub score: f64,
    pub level: RiskLevel,
    pub factors: Vec<RiskFactorView>,
}

/// Derives the risk gauge. The level comes from the backend when it names a
/// known one, else from the score band.
pub fn derive_risk_gauge(report: Option<&AggregatedReport>) -> RiskGauge {
    let risk = report.and_then(AggregatedReport::risk);

    let score = risk
        .and_then(|r| r.overall_risk_score)
        .filter(|s| s.is_finite())
        .unwrap_or(fallback::RISK_SCORE)
        .clamp(0.0, 100.0);

    let level = risk
        .and_then(|r| r.risk_level.as_deref())
        .and_then(RiskLevel::parse)
        .unwrap_or_else(|| RiskLevel::from_score(score));

    let mut factors: Vec<RiskFactorView> = risk
        .map(|r| {
            r.factors
                .iter()
                .filter_map(|f| {
                    Some(RiskFactorView {
                        name: f.factor.clone().filter(|n| !n.trim().is_empty())?,
                        impact: f.impact.clone(),
                        description: f.description.clone(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if factors.is_empty() {
        factors.push(RiskFactorView {
            name: fallback::RISK_FACTOR_NONE.to_string(),
            impact: None,
            description: None,
        });
    }

    RiskGauge {
        score,
        level,
        factors,
    }
}

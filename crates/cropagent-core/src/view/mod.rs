//! View derivation module.
//!
//! Pure functions from "the current report (maybe absent)" to what each
//! dashboard panel displays. Every function is total: a missing report or
//! a missing section yields the documented fallback values, never an error.
//!
//! # Module Structure
//!
//! - `fallback`: Fallback table shared by every panel
//! - `stats`: Stat tiles (`StatTiles`, `derive_stats`)
//! - `charts`: Chart datasets (`ChartSeries`, `derive_chart_series`)
//! - `gauge`: Risk gauge (`RiskGauge`, `derive_risk_gauge`)
//! - `map`: Map overlay (`MapOverlay`, `derive_map_overlay`)

pub mod fallback;
mod charts;
mod gauge;
mod map;
mod stats;

pub use charts::{
    BarSeries, ChartSeries, GaugeSeries, LineSeries, NamedSeries, ThresholdBand,
    derive_chart_series,
};
pub use gauge::{RiskFactorView, RiskGauge, RiskLevel, derive_risk_gauge};
pub use map::{MapMarker, MapOverlay, derive_map_overlay, health_color};
pub use stats::{StatTiles, derive_stats, derive_stats_with};

use crate::region::RegionCatalog;
use crate::report::{AggregatedReport, Prefetched};
use serde::Serialize;

/// Everything the dashboard renders for one report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub stats: StatTiles,
    pub charts: ChartSeries,
    pub risk: RiskGauge,
    pub map: MapOverlay,
}

impl DashboardView {
    /// Derives every panel at once.
    ///
    /// Prefetched snapshots fill the stat tiles and the map's health score
    /// only where the report leaves a gap.
    pub fn derive(
        report: Option<&AggregatedReport>,
        prefetched: &Prefetched,
        catalog: &RegionCatalog,
        region: &str,
    ) -> Self {
        let health = report
            .and_then(AggregatedReport::health_score)
            .or_else(|| prefetched.soil_health());

        Self {
            stats: derive_stats_with(report, prefetched),
            charts: derive_chart_series(report),
            risk: derive_risk_gauge(report),
            map: derive_map_overlay(catalog, region, health),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SoilSnapshot;

    #[test]
    fn test_empty_view_is_all_fallbacks() {
        let catalog = RegionCatalog::builtin();
        let view = DashboardView::derive(None, &Prefetched::default(), &catalog, "Maharashtra");

        assert_eq!(view.stats, StatTiles::fallback());
        assert_eq!(view.charts, derive_chart_series(None));
        assert_eq!(view.risk.score, 30.0);
        let selected = view.map.markers.iter().find(|m| m.selected).unwrap();
        assert_eq!(selected.health_score, Some(70.0));
    }

    #[test]
    fn test_soil_snapshot_feeds_map_until_report_arrives() {
        let catalog = RegionCatalog::builtin();
        let prefetched = Prefetched {
            weather: None,
            soil: Some(SoilSnapshot {
                health_score: Some(48.0),
                ..Default::default()
            }),
        };
        let view = DashboardView::derive(None, &prefetched, &catalog, "Gujarat");
        let selected = view.map.markers.iter().find(|m| m.selected).unwrap();
        assert_eq!(selected.health_score, Some(48.0));
        assert_eq!(selected.color, fallback::COLOR_POOR);

        let report: AggregatedReport =
            serde_json::from_str(r#"{"crop_health_card": {"health_score": 82}}"#).unwrap();
        let view = DashboardView::derive(Some(&report), &prefetched, &catalog, "Gujarat");
        let selected = view.map.markers.iter().find(|m| m.selected).unwrap();
        assert_eq!(selected.health_score, Some(82.0));
    }
}

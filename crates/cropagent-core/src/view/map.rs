//! Map overlay: one marker per region, the selected one colored by crop
//! health.

use super::fallback;
use crate::region::RegionCatalog;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub region: String,
    pub lat: f64,
    pub lon: f64,
    pub selected: bool,
    /// Only set on the selected marker.
    pub health_score: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOverlay {
    /// (lat, lon) the map centers on.
    pub center: (f64, f64),
    pub markers: Vec<MapMarker>,
}

/// Color of a 0-100 crop health score.
pub fn health_color(score: f64) -> &'static str {
    if score >= 70.0 {
        fallback::COLOR_GOOD
    } else if score >= 50.0 {
        fallback::COLOR_FAIR
    } else {
        fallback::COLOR_POOR
    }
}

/// Builds the overlay for `region`.
///
/// # Arguments
///
/// * `catalog` - Regions to place on the map, in catalog order
/// * `region` - The selected region; an unknown name centers on the default region
/// * `health_score` - Health of the selected crop, if known
pub fn derive_map_overlay(
    catalog: &RegionCatalog,
    region: &str,
    health_score: Option<f64>,
) -> MapOverlay {
    let health = health_score.unwrap_or(fallback::HEALTH_SCORE);
    let focus = catalog.get(region).unwrap_or_else(|| catalog.default_region());

    let markers = catalog
        .regions()
        .iter()
        .map(|r| {
            let selected = r.name == region;
            MapMarker {
                region: r.name.clone(),
                lat: r.lat,
                lon: r.lon,
                selected,
                health_score: selected.then_some(health),
                color: if selected {
                    health_color(health)
                } else {
                    fallback::COLOR_NEUTRAL
                }
                .to_string(),
            }
        })
        .collect();

    MapOverlay {
        center: (focus.lat, focus.lon),
        markers,
    }
}

use crate::error::{CropAgentError, Result};
use serde::{Deserialize, Serialize};

/// Region a fresh session starts in.
pub const DEFAULT_REGION: &str = "Maharashtra";

/// A region with its map coordinates and ordered crop set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Ordered crop set. `/api/states` names this field `major_crops`.
    #[serde(alias = "major_crops")]
    pub crops: Vec<String>,
}

impl Region {
    fn new(name: &str, lat: f64, lon: f64, crops: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
            crops: crops.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Returns true if `crop` is part of this region's crop set.
    pub fn grows(&self, crop: &str) -> bool {
        self.crops.iter().any(|c| c == crop)
    }

    /// First crop of the set; catalogs never hold a region with an empty set.
    pub fn first_crop(&self) -> &str {
        self.crops.first().map(String::as_str).unwrap_or_default()
    }
}

/// Ordered collection of supported regions.
///
/// Order matters for the region picker and for the map overlay, so the
/// catalog keeps regions in the order they were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCatalog {
    regions: Vec<Region>,
}

impl RegionCatalog {
    /// Builds a catalog from an arbitrary region list.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the list is empty or any region has an
    /// empty crop set, since selection fallback needs a first crop.
    pub fn new(regions: Vec<Region>) -> Result<Self> {
        if regions.is_empty() {
            return Err(CropAgentError::config("region catalog is empty"));
        }
        if let Some(region) = regions.iter().find(|r| r.crops.is_empty()) {
            return Err(CropAgentError::config(format!(
                "region '{}' has no crops",
                region.name
            )));
        }
        Ok(Self { regions })
    }

    /// The ten states the backend supports, with their major crops.
    pub fn builtin() -> Self {
        Self {
            regions: vec![
                Region::new("Maharashtra", 19.7515, 75.7139, &["Rice", "Cotton", "Sugarcane", "Soybean"]),
                Region::new("Punjab", 31.1471, 75.3412, &["Wheat", "Rice", "Cotton", "Maize"]),
                Region::new("Uttar Pradesh", 26.8467, 80.9462, &["Wheat", "Rice", "Sugarcane", "Potato"]),
                Region::new("Madhya Pradesh", 22.9734, 78.6569, &["Wheat", "Soybean", "Gram", "Rice"]),
                Region::new("Karnataka", 15.3173, 75.7139, &["Rice", "Ragi", "Sugarcane", "Cotton"]),
                Region::new("Gujarat", 22.2587, 71.1924, &["Cotton", "Groundnut", "Wheat", "Rice"]),
                Region::new("Rajasthan", 27.0238, 74.2179, &["Wheat", "Bajra", "Mustard", "Gram"]),
                Region::new("Tamil Nadu", 11.1271, 78.6569, &["Rice", "Sugarcane", "Cotton", "Groundnut"]),
                Region::new("Andhra Pradesh", 15.9129, 79.7400, &["Rice", "Cotton", "Chilli", "Groundnut"]),
                Region::new("West Bengal", 22.9868, 87.8550, &["Rice", "Jute", "Potato", "Wheat"]),
            ],
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Ordered crop set of `region`, if the region is known.
    pub fn crops_for(&self, region: &str) -> Option<&[String]> {
        self.get(region).map(|r| r.crops.as_slice())
    }

    /// Region a new session starts in: `Maharashtra` when present, else the
    /// first catalog entry.
    pub fn default_region(&self) -> &Region {
        self.get(DEFAULT_REGION).unwrap_or(&self.regions[0])
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

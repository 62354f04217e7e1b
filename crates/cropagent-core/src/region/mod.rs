//! Region domain module.
//!
//! A region is an administrative area (an Indian state) with coordinates for
//! the map panel and an ordered set of cultivable crops. The first crop of
//! each set is the one a selection falls back to.

mod catalog;

pub use catalog::{DEFAULT_REGION, Region, RegionCatalog};

/// Identifier of a region, e.g. `"Maharashtra"`.
pub type RegionId = String;

/// Identifier of a crop, e.g. `"Cotton"`.
pub type CropId = String;

//! Selection triple and its consistency rules.

use super::language::Language;
use crate::error::{CropAgentError, Result};
use crate::region::{CropId, RegionCatalog, RegionId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The (region, crop, language) triple the user is currently viewing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub region: RegionId,
    pub crop: CropId,
    pub language: Language,
}

/// Which user action produced a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Region,
    Crop,
    Language,
}

/// "Selection changed" notification carrying the full new triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChanged {
    pub kind: ChangeKind,
    pub selection: Selection,
}

/// Holds the current selection and enforces crop-belongs-to-region.
///
/// Region and crop are updated together inside a single `&mut self` call, so
/// no caller can observe a crop that does not belong to the current region.
/// Every successful mutation returns a [`SelectionChanged`]; rejected or
/// no-op mutations return `None`.
#[derive(Debug, Clone)]
pub struct SelectionState {
    catalog: Arc<RegionCatalog>,
    current: Selection,
}

impl SelectionState {
    /// Creates a selection with the catalog defaults: the default region,
    /// its first crop, and English.
    pub fn new(catalog: Arc<RegionCatalog>) -> Self {
        let region = catalog.default_region();
        let current = Selection {
            region: region.name.clone(),
            crop: region.first_crop().to_string(),
            language: Language::default(),
        };
        Self { catalog, current }
    }

    /// Creates a selection from preferred values. Values that would break
    /// the invariant are dropped the same way user events are: an unknown
    /// region keeps the default region, a crop outside the set keeps the
    /// crop chosen by the region rule.
    pub fn with_preferences(
        catalog: Arc<RegionCatalog>,
        region: Option<&str>,
        crop: Option<&str>,
        language: Language,
    ) -> Self {
        let mut state = Self::new(catalog);
        state.current.language = language;
        if let Some(region) = region {
            state.set_region(region);
        }
        if let Some(crop) = crop {
            state.set_crop(crop);
        }
        state
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    pub fn region(&self) -> &str {
        &self.current.region
    }

    pub fn crop(&self) -> &str {
        &self.current.crop
    }

    pub fn language(&self) -> Language {
        self.current.language
    }

    pub fn catalog(&self) -> &Arc<RegionCatalog> {
        &self.catalog
    }

    /// Crop set of the current region.
    pub fn available_crops(&self) -> &[String] {
        self.catalog
            .crops_for(&self.current.region)
            .unwrap_or_default()
    }

    /// Switches region, resetting the crop to the new set's first entry when
    /// the current crop is not grown there.
    ///
    /// Unknown regions and re-selecting the current region are no-ops.
    pub fn set_region(&mut self, region: &str) -> Option<SelectionChanged> {
        if region == self.current.region {
            return None;
        }
        let Some(next) = self.catalog.get(region) else {
            tracing::debug!("[SelectionState] Ignoring unknown region: {}", region);
            return None;
        };

        let crop = if next.grows(&self.current.crop) {
            self.current.crop.clone()
        } else {
            next.first_crop().to_string()
        };

        self.current = Selection {
            region: next.name.clone(),
            crop,
            language: self.current.language,
        };
        Some(self.changed(ChangeKind::Region))
    }

    /// Selects a crop of the current region. Crops outside the region's set
    /// are silently rejected.
    pub fn set_crop(&mut self, crop: &str) -> Option<SelectionChanged> {
        match self.try_set_crop(crop) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::debug!("[SelectionState] {}", e);
                None
            }
        }
    }

    /// Like [`set_crop`](Self::set_crop) but reports the rejection.
    ///
    /// # Errors
    ///
    /// Returns `CropAgentError::Selection` if `crop` is not grown in the
    /// current region.
    pub fn try_set_crop(&mut self, crop: &str) -> Result<Option<SelectionChanged>> {
        if crop == self.current.crop {
            return Ok(None);
        }
        if !self.available_crops().iter().any(|c| c == crop) {
            return Err(CropAgentError::selection(&self.current.region, crop));
        }
        self.current.crop = crop.to_string();
        Ok(Some(self.changed(ChangeKind::Crop)))
    }

    /// Switches language; region and crop are untouched.
    pub fn set_language(&mut self, language: Language) -> Option<SelectionChanged> {
        if language == self.current.language {
            return None;
        }
        self.current.language = language;
        Some(self.changed(ChangeKind::Language))
    }

    fn changed(&self, kind: ChangeKind) -> SelectionChanged {
        SelectionChanged {
            kind,
            selection: self.current.clone(),
        }
    }
}

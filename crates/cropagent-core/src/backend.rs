//! Backend trait for the analysis service.
//!
//! Defines the interface the session layer consumes, decoupling orchestration
//! from the transport (HTTP, a scripted test double, ...).

use crate::error::Result;
use crate::report::{AnalysisRequest, AnalysisResponse, SoilSnapshot, WeatherSnapshot};
use async_trait::async_trait;

/// An abstract client for the crop analysis backend.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Return `Err` for transport failures, non-success HTTP statuses and
///   `success = false` bodies
/// - Never retry; the session reports failures once to the initiator
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Runs the full analysis pipeline for one request.
    ///
    /// # Returns
    ///
    /// - `Ok(AnalysisResponse)`: Pipeline completed with `success = true`
    /// - `Err(_)`: Transport failure or backend-reported failure
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse>;

    /// Fetches the current weather snapshot of a region.
    async fn weather(&self, region: &str) -> Result<WeatherSnapshot>;

    /// Fetches the soil snapshot of a region for a crop.
    async fn soil(&self, region: &str, crop: &str) -> Result<SoilSnapshot>;
}

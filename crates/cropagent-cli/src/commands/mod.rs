pub mod dashboard;
pub mod info;
pub mod watch;

use crate::SelectionArgs;
use anyhow::{Context as _, Result};
use cropagent_application::DashboardSession;
use cropagent_core::config::DashboardConfig;
use cropagent_core::region::RegionCatalog;
use cropagent_interaction::HttpAnalysisBackend;
use serde::Serialize;
use std::sync::Arc;

/// Resolved configuration plus the HTTP client built from it.
pub struct Context {
    pub config: DashboardConfig,
    pub backend: Arc<HttpAnalysisBackend>,
}

impl Context {
    pub fn load(api_url: Option<String>, timeout: Option<u64>) -> Result<Self> {
        let mut config = DashboardConfig::load().context("Failed to load configuration")?;
        if let Some(url) = api_url {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(seconds) = timeout {
            config.request_timeout_secs = seconds;
        }
        let backend = HttpAnalysisBackend::from_config(&config)?;
        Ok(Self {
            config,
            backend: Arc::new(backend),
        })
    }

    /// The backend's region list, or the built-in one when it is unreachable.
    pub async fn catalog(&self) -> Arc<RegionCatalog> {
        match self.backend.states().await.and_then(RegionCatalog::new) {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => {
                tracing::warn!("Using built-in region catalog: {}", e);
                Arc::new(RegionCatalog::builtin())
            }
        }
    }

    /// A session positioned on the requested selection without refreshing.
    pub async fn session(&self, selection: &SelectionArgs) -> DashboardSession {
        let mut config = self.config.clone();
        if let Some(region) = &selection.region {
            config.default_region = region.clone();
        }
        if let Some(crop) = &selection.crop {
            config.default_crop = Some(crop.clone());
        }
        if let Some(language) = selection.language {
            config.default_language = language;
        }
        DashboardSession::new(self.backend.clone(), self.catalog().await, &config)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

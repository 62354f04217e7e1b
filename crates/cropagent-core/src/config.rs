//! Dashboard configuration.
//!
//! Values resolve in three layers: built-in defaults, then the optional
//! file `~/.config/cropagent/config.toml`, then the `CROPAGENT_API_URL`
//! environment variable for the backend base URL.

use crate::error::{CropAgentError, Result};
use crate::region::RegionCatalog;
use crate::selection::Language;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "CROPAGENT_API_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Matches the backend's own per-agent timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub realtime_enabled: bool,
    pub default_region: String,
    pub default_crop: Option<String>,
    pub default_language: Language,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            realtime_enabled: false,
            default_region: crate::region::DEFAULT_REGION.to_string(),
            default_crop: None,
            default_language: Language::En,
        }
    }
}

impl DashboardConfig {
    /// Path of the user config file, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cropagent").join("config.toml"))
    }

    /// Loads the configuration from the default path and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file exists but cannot be read or
    /// parsed. A missing file is not an error.
    pub fn load() -> Result<Self> {
        Self::resolve(Self::default_path().as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Resolves the configuration from an optional file and an environment
    /// lookup.
    ///
    /// # Arguments
    ///
    /// * `path` - Config file to read; skipped when `None` or missing
    /// * `env` - Environment lookup, e.g. `std::env::var(key).ok()`
    pub fn resolve(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };

        if let Some(url) = env(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            tracing::debug!("[DashboardConfig] {} overrides api_base_url", API_URL_ENV);
            config.api_base_url = url.trim().to_string();
        }

        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        if config.api_base_url.is_empty() {
            return Err(CropAgentError::config("api_base_url is empty"));
        }
        Ok(config)
    }

    /// Parses a TOML config file. An empty file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CropAgentError::config(format!("Failed to read config file at {:?}: {}", path, e))
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        toml::from_str(&content).map_err(|e| {
            CropAgentError::config(format!("Failed to parse config file at {:?}: {}", path, e))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Real-time channel URL derived from the base URL.
    pub fn realtime_url(&self) -> String {
        let base = &self.api_base_url;
        let ws = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.clone()
        };
        format!("{}/ws", ws)
    }

    /// Default region and crop, falling back to catalog defaults where the
    /// configured names are not valid.
    pub fn default_selection(&self, catalog: &RegionCatalog) -> (String, String) {
        let region = catalog
            .get(&self.default_region)
            .unwrap_or_else(|| catalog.default_region());
        let crop = self
            .default_crop
            .as_deref()
            .filter(|c| region.grows(c))
            .unwrap_or_else(|| region.first_crop());
        (region.name.clone(), crop.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = DashboardConfig::resolve(None, no_env).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.realtime_url(), "ws://localhost:8000/ws");
    }

    #[test]
    fn test_file_then_env_precedence() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_base_url = "http://farm.local:9000/"
request_timeout_secs = 12
default_region = "Punjab"
default_language = "mr"
"#
        )
        .unwrap();

        let config = DashboardConfig::resolve(Some(file.path()), no_env).unwrap();
        assert_eq!(config.api_base_url, "http://farm.local:9000");
        assert_eq!(config.request_timeout_secs, 12);
        assert_eq!(config.default_language, Language::Mr);
        assert!(!config.realtime_enabled);

        let config = DashboardConfig::resolve(Some(file.path()), |key| {
            (key == API_URL_ENV).then(|| "https://agri.example.org".to_string())
        })
        .unwrap();
        assert_eq!(config.api_base_url, "https://agri.example.org");
        assert_eq!(config.realtime_url(), "wss://agri.example.org/ws");
        assert_eq!(config.default_region, "Punjab");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = \"soon\"").unwrap();
        let err = DashboardConfig::resolve(Some(file.path()), no_env).unwrap_err();
        assert!(matches!(err, CropAgentError::Config(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = DashboardConfig::resolve(Some(&path), no_env).unwrap();
        assert_eq!(config.default_region, "Maharashtra");
    }

    #[test]
    fn test_default_selection_falls_back_to_catalog() {
        let catalog = RegionCatalog::builtin();
        let config = DashboardConfig {
            default_region: "Atlantis".into(),
            default_crop: Some("Wheat".into()),
            ..Default::default()
        };
        assert_eq!(
            config.default_selection(&catalog),
            ("Maharashtra".to_string(), "Rice".to_string())
        );

        let config = DashboardConfig {
            default_region: "Punjab".into(),
            default_crop: Some("Maize".into()),
            ..Default::default()
        };
        assert_eq!(
            config.default_selection(&catalog),
            ("Punjab".to_string(), "Maize".to_string())
        );
    }
}

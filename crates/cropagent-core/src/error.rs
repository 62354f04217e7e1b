//! Error types for the CropAgent dashboard session layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the dashboard session layer.
///
/// Nothing in this layer is fatal: every variant degrades to "keep showing
/// the last-known-good state" or "show the documented defaults".
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CropAgentError {
    /// A crop was selected that does not belong to the current region.
    #[error("Crop '{crop}' is not grown in region '{region}'")]
    Selection { region: String, crop: String },

    /// A region name that the catalog does not know about.
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// A language code outside the supported set.
    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),

    /// Request failed at the transport level or the backend reported failure.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    /// Request exceeded the configured bound.
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Response body could not be decoded as the backend contract.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Real-time channel failure (connect, send or receive)
    #[error("Realtime channel error: {0}")]
    Realtime(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CropAgentError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Selection error
    pub fn selection(region: impl Into<String>, crop: impl Into<String>) -> Self {
        Self::Selection {
            region: region.into(),
            crop: crop.into(),
        }
    }

    /// Creates a Transport error without an HTTP status
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a Transport error for a non-success HTTP status
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Realtime error
    pub fn realtime(message: impl Into<String>) -> Self {
        Self::Realtime(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Selection error
    pub fn is_selection(&self) -> bool {
        matches!(self, Self::Selection { .. })
    }

    /// Check if this error came from the network round trip.
    ///
    /// Timeouts and undecodable bodies count as transport failures: the
    /// canonical report is left untouched in all three cases.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Decode(_)
        )
    }

    /// Check if this is a Timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CropAgentError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for CropAgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for CropAgentError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML: {}", err))
    }
}

impl From<reqwest::Error> for CropAgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not report the configured duration
            return Self::Transport {
                message: format!("timed out: {}", err),
                status: None,
            };
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Transport {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }
}

/// A type alias for `Result<T, CropAgentError>`.
pub type Result<T> = std::result::Result<T, CropAgentError>;

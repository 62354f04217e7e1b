//! Transport adapters for the crop analysis backend.
//!
//! # Module Structure
//!
//! - `http_backend`: REST client implementing `AnalysisBackend` (`HttpAnalysisBackend`)
//! - `realtime`: Websocket channel for push updates (`RealtimeChannel`)

pub mod http_backend;
pub mod realtime;

pub use http_backend::{HistoryQuery, HttpAnalysisBackend};
pub use realtime::{RealtimeChannel, RealtimeReceiver};

//! Core domain of the CropAgent dashboard session layer.
//!
//! Holds the pure parts of the session: the region catalog, the selection
//! triple, the backend's report contract, the chat timeline, and the view
//! derivation functions. Nothing here performs I/O except configuration
//! loading; the backend is reached through [`backend::AnalysisBackend`].

pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod i18n;
pub mod region;
pub mod report;
pub mod selection;
pub mod view;

// Re-export common error type
pub use error::{CropAgentError, Result};

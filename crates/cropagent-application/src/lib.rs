//! Application layer for the CropAgent dashboard.
//!
//! This crate coordinates the core domain with a backend transport: the
//! fetch coordinator settles concurrent refreshes, and the dashboard session
//! turns user intents into refreshes and chat exchanges.

pub mod coordinator;
pub mod session;

pub use coordinator::{CoordinatorSnapshot, FetchCoordinator, RefreshOutcome, RefreshStream};
pub use session::{ChatExchange, DashboardSession, SessionEvent};

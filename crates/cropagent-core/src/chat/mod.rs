//! Chat domain module.
//!
//! # Module Structure
//!
//! - `message`: Message types (`ChatRole`, `ChatMessage`)
//! - `timeline`: Append-only ordered log (`ChatTimeline`)

mod message;
mod timeline;

pub use message::{ChatMessage, ChatRole};
pub use timeline::ChatTimeline;

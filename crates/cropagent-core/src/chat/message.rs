//! Chat message types.

use crate::report::AggregatedReport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Represents the author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Message typed by the user.
    User,
    /// Answer produced by the analysis backend.
    Agent,
    /// Notice generated by the session itself (e.g. a failed request).
    System,
}

/// A single message in the chat timeline.
///
/// Messages are immutable once appended. An answer is linked to its
/// question through `in_reply_to`, never through its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier (UUID format)
    pub id: String,
    pub role: ChatRole,
    /// Display text
    pub text: String,
    /// Timestamp when the message was appended (ISO 8601 format)
    pub timestamp: String,
    /// ID of the user message this message answers
    pub in_reply_to: Option<String>,
    /// Full report behind an agent answer, for the yield, recommendation
    /// and irrigation sub-panels
    pub attached_report: Option<Arc<AggregatedReport>>,
}

impl ChatMessage {
    pub(crate) fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            in_reply_to: None,
            attached_report: None,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

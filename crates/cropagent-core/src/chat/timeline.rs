//! Append-only chat timeline.

use super::message::{ChatMessage, ChatRole};
use crate::report::AggregatedReport;
use std::sync::Arc;

/// Ordered log of chat messages.
///
/// Insertion order is display order. The timeline only grows: there is no
/// API to reorder, edit or remove a message once appended.
#[derive(Debug, Clone, Default)]
pub struct ChatTimeline {
    messages: Vec<ChatMessage>,
}

impl ChatTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user message and returns its ID.
    ///
    /// Called before the request leaves, so the user's input order is
    /// preserved however long the answers take.
    pub fn append_user(&mut self, text: impl Into<String>) -> String {
        self.push(ChatMessage::new(ChatRole::User, text))
    }

    /// Appends an agent answer carrying `report`.
    ///
    /// The display text is the report's summary text when present, else
    /// `fallback_text`.
    pub fn append_agent(
        &mut self,
        report: Arc<AggregatedReport>,
        fallback_text: &str,
        in_reply_to: Option<&str>,
    ) -> String {
        let text = report.summary_text().unwrap_or(fallback_text).to_string();
        let mut message = ChatMessage::new(ChatRole::Agent, text);
        message.in_reply_to = in_reply_to.map(str::to_string);
        message.attached_report = Some(report);
        self.push(message)
    }

    /// Appends a one-line system notice, e.g. for a failed request.
    pub fn append_notice(&mut self, text: impl Into<String>, in_reply_to: Option<&str>) -> String {
        let mut message = ChatMessage::new(ChatRole::System, text);
        message.in_reply_to = in_reply_to.map(str::to_string);
        self.push(message)
    }

    fn push(&mut self, message: ChatMessage) -> String {
        let id = message.id.clone();
        tracing::debug!(
            "[ChatTimeline] Appended {:?} message #{} (id={})",
            message.role,
            self.messages.len(),
            id
        );
        self.messages.push(message);
        id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// The message answering the user message `question_id`, if any.
    pub fn reply_to(&self, question_id: &str) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .find(|m| m.in_reply_to.as_deref() == Some(question_id))
    }

    /// Report attached to the most recently appended agent message.
    pub fn last_report(&self) -> Option<&Arc<AggregatedReport>> {
        self.messages
            .iter()
            .rev()
            .find_map(|m| m.attached_report.as_ref())
    }
}

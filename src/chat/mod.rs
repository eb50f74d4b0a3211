//! Follow-up conversation state and context-window assembly.
//!
//! A [`ChatContextManager`] owns the append-only conversation bound to one
//! review result. Each outbound turn carries a bounded slice of prior
//! messages (the sliding context window) plus the code, language and bound
//! result, so the chat collaborator can answer without server-side state.

use serde::Serialize;
use thiserror::Error;

use crate::models::chat::{ChatMessage, Role};
use crate::models::ReviewResult;

/// Number of prior messages sent as context with each chat turn.
pub const CONTEXT_WINDOW: usize = 6;

/// Static reply appended when a chat turn fails. Chat failures degrade
/// gracefully; they never abort the session.
const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Errors from the conversation layer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("no review result is bound to this conversation")]
    NoReviewBound,

    /// A previous send has not resolved yet. Single-flight per
    /// conversation keeps responses from interleaving.
    #[error("a chat message is already in flight")]
    SendInFlight,
}

/// Wire payload for one chat turn, sent to POST /api/chat.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutboundChat {
    pub message: String,
    pub code: String,
    pub language: String,
    pub review_context: ReviewResult,
    /// At most [`CONTEXT_WINDOW`] prior messages, oldest first.
    pub chat_history: Vec<ChatMessage>,
}

/// Conversation state for one review result.
pub struct ChatContextManager {
    conversation: Vec<ChatMessage>,
    pending: bool,
    result: ReviewResult,
    language: String,
    window: usize,
    next_id: u64,
}

impl ChatContextManager {
    /// Bind a conversation to a freshly produced review result.
    ///
    /// Seeds the conversation with one synthesized assistant message
    /// summarising the score. Seeding happens here and only here, so a
    /// new result always means a new manager and exactly one welcome.
    pub fn for_result(result: ReviewResult, language: &str) -> Self {
        let mut manager = Self {
            conversation: Vec::new(),
            pending: false,
            result,
            language: language.to_string(),
            window: CONTEXT_WINDOW,
            next_id: 1,
        };
        let welcome = format!(
            "Hi! I'm your AI code review assistant. I've analyzed your {} code and found \
             a quality score of {}/100. Feel free to ask me questions about:\n\n\
             \u{2022} Specific bugs or issues I found\n\
             \u{2022} Security concerns and how to fix them\n\
             \u{2022} Performance optimization strategies\n\
             \u{2022} Refactoring suggestions\n\
             \u{2022} Best practices for your code\n\n\
             What would you like to know?",
            manager.language, manager.result.overall_score,
        );
        manager.push(Role::Assistant, welcome);
        manager
    }

    /// Override the context window size. Values above the default are
    /// clamped so the wire contract's bound holds regardless of config.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.min(CONTEXT_WINDOW);
        self
    }

    pub fn conversation(&self) -> &[ChatMessage] {
        &self.conversation
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The review result this conversation is bound to.
    pub fn result(&self) -> &ReviewResult {
        &self.result
    }

    /// Start a chat turn: append the user message optimistically and
    /// return the outbound payload.
    ///
    /// The context window is captured from the conversation as it stood
    /// before this message — the user text travels separately in the
    /// `message` field, not duplicated in the history.
    pub fn begin_send(&mut self, user_text: &str, code: &str) -> Result<OutboundChat, ChatError> {
        if user_text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.pending {
            return Err(ChatError::SendInFlight);
        }

        let chat_history: Vec<ChatMessage> = self
            .conversation
            .iter()
            .rev()
            .take(self.window)
            .rev()
            .cloned()
            .collect();

        self.push(Role::User, user_text.to_string());
        self.pending = true;

        Ok(OutboundChat {
            message: user_text.to_string(),
            code: code.to_string(),
            language: self.language.clone(),
            review_context: self.result.clone(),
            chat_history,
        })
    }

    /// Record the assistant's reply for the in-flight turn.
    pub fn complete_send(&mut self, assistant_text: String) {
        self.push(Role::Assistant, assistant_text);
        self.pending = false;
    }

    /// Record the static fallback reply for a failed turn.
    pub fn fail_send(&mut self) {
        self.push(Role::Assistant, FALLBACK_REPLY.to_string());
        self.pending = false;
    }

    fn push(&mut self, role: Role, content: String) {
        let id = self.next_id;
        self.next_id += 1;
        self.conversation.push(ChatMessage::new(id, role, content));
    }
}

//! Review session: the composition root of the client logic.
//!
//! A [`ReviewSession`] owns the code under review, the latest result, the
//! bound chat conversation and a staleness guard for concurrent request
//! resolution. Errors from the collaborator API leave the session in its
//! previous valid state; nothing here aborts the process.

use std::sync::Arc;

use crate::api::{ApiError, ReviewApi};
use crate::chat::{ChatContextManager, ChatError};
use crate::models::{RefactoringSuggestion, ReviewResult};

/// Monotonic per-request-class sequence for discarding stale responses.
///
/// Each submission stamps a fresh number; a response only takes effect if
/// its number is still the latest issued. A newer submission silently
/// invalidates every response still in flight.
#[derive(Debug, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    /// Stamp a new request.
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Whether a response stamped with `seq` may still take effect.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

/// Whether a completed review installed its result or was discarded as
/// stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Installed,
    Stale,
}

/// One user's review-in-progress.
pub struct ReviewSession {
    api: Arc<dyn ReviewApi>,
    code: String,
    language: String,
    result: Option<ReviewResult>,
    chat: Option<ChatContextManager>,
    review_seq: RequestSeq,
    chat_window: usize,
}

impl ReviewSession {
    pub fn new(api: Arc<dyn ReviewApi>, language: &str, chat_window: usize) -> Self {
        Self {
            api,
            code: String::new(),
            language: language.to_string(),
            result: None,
            chat: None,
            review_seq: RequestSeq::default(),
            chat_window,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn set_code(&mut self, code: &str) {
        self.code = code.to_string();
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn result(&self) -> Option<&ReviewResult> {
        self.result.as_ref()
    }

    pub fn chat(&self) -> Option<&ChatContextManager> {
        self.chat.as_ref()
    }

    /// Validate the pending submission and stamp its sequence number.
    ///
    /// Empty code is rejected here, before any network traffic.
    pub fn begin_review(&mut self) -> Result<u64, ApiError> {
        if self.code.trim().is_empty() {
            return Err(ApiError::EmptyCode);
        }
        Ok(self.review_seq.begin())
    }

    /// Install a completed review if its request is still current.
    ///
    /// A current result replaces the previous one and re-seeds the chat
    /// conversation; a stale one is dropped without touching any state.
    pub fn install_result(&mut self, seq: u64, result: ReviewResult) -> SubmitOutcome {
        if !self.review_seq.is_current(seq) {
            return SubmitOutcome::Stale;
        }
        self.chat = Some(
            ChatContextManager::for_result(result.clone(), &self.language)
                .with_window(self.chat_window),
        );
        self.result = Some(result);
        SubmitOutcome::Installed
    }

    /// Submit the session code for review and install the result.
    pub async fn submit_review(&mut self) -> Result<SubmitOutcome, ApiError> {
        let seq = self.begin_review()?;
        let result = self.api.submit_review(&self.code, &self.language).await?;
        Ok(self.install_result(seq, result))
    }

    /// One follow-up chat turn. Returns the assistant text appended to
    /// the conversation.
    ///
    /// API failures degrade to the static fallback reply rather than an
    /// error; only local validation (empty text, no bound review, a turn
    /// already in flight) is surfaced.
    pub async fn send_chat(&mut self, text: &str) -> Result<String, ChatError> {
        let chat = self.chat.as_mut().ok_or(ChatError::NoReviewBound)?;
        let outbound = chat.begin_send(text, &self.code)?;
        match self.api.chat_turn(&outbound).await {
            Ok(reply) => {
                chat.complete_send(reply.clone());
                Ok(reply)
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat turn failed");
                chat.fail_send();
                Ok(chat
                    .conversation()
                    .last()
                    .map(|msg| msg.content.clone())
                    .unwrap_or_default())
            }
        }
    }

    /// Replace the session code with a suggestion's improved version.
    ///
    /// One whole-code assignment, so there is no partial application and
    /// applying the same suggestion twice is a no-op by construction. The
    /// suggestion's `current_code` is display context only; it does not
    /// have to match the session text. A suggestion with no improved code
    /// is ignored rather than blanking the session.
    pub fn apply_improvement(&mut self, suggestion: &RefactoringSuggestion) {
        if suggestion.improved_code.is_empty() {
            return;
        }
        self.code = suggestion.improved_code.clone();
    }

    /// Persist the current review server-side, fire-and-forget.
    ///
    /// Failures are logged and never surfaced; history is a convenience,
    /// not part of the review flow.
    pub fn save_to_history(&self) {
        let Some(result) = self.result.clone() else {
            return;
        };
        let api = Arc::clone(&self.api);
        let code = self.code.clone();
        let language = self.language.clone();
        tokio::spawn(async move {
            if let Err(err) = api.save_history(&code, &language, &result).await {
                tracing::warn!(error = %err, "failed to save review to history");
            }
        });
    }

    /// Ask the service to resend the verification email, fire-and-forget.
    pub fn resend_verification(&self) {
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            if let Err(err) = api.resend_verification().await {
                tracing::warn!(error = %err, "failed to resend verification email");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_with_score(score: u8) -> ReviewResult {
        ReviewResult::from_json(json!({
            "overall_score": score,
            "summary": "s",
            "strengths": [],
        }))
        .unwrap()
    }

    struct NoopApi;

    #[async_trait::async_trait]
    impl ReviewApi for NoopApi {
        async fn submit_review(&self, _: &str, _: &str) -> Result<ReviewResult, ApiError> {
            Ok(result_with_score(70))
        }
        async fn chat_turn(&self, _: &crate::chat::OutboundChat) -> Result<String, ApiError> {
            Ok("reply".into())
        }
        async fn save_history(
            &self,
            _: &str,
            _: &str,
            _: &ReviewResult,
        ) -> Result<(), ApiError> {
            Ok(())
        }
        async fn list_history(&self) -> Result<Vec<crate::models::HistoryRecord>, ApiError> {
            Ok(Vec::new())
        }
        async fn clear_history(&self) -> Result<(), ApiError> {
            Ok(())
        }
        async fn resend_verification(&self) -> Result<(), ApiError> {
            Ok(())
        }
        async fn verify_email(&self, _: &str) -> Result<crate::api::VerifyOutcome, ApiError> {
            Ok(crate::api::VerifyOutcome::Verified)
        }
    }

    fn session() -> ReviewSession {
        ReviewSession::new(Arc::new(NoopApi), "python", crate::chat::CONTEXT_WINDOW)
    }

    #[test]
    fn begin_review_rejects_empty_code() {
        let mut s = session();
        assert!(matches!(s.begin_review(), Err(ApiError::EmptyCode)));
        s.set_code("   \n ");
        assert!(matches!(s.begin_review(), Err(ApiError::EmptyCode)));
    }

    #[test]
    fn request_seq_is_monotonic() {
        let mut seq = RequestSeq::default();
        let a = seq.begin();
        let b = seq.begin();
        assert!(b > a);
        assert!(seq.is_current(b));
        assert!(!seq.is_current(a));
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut s = session();
        s.set_code("print('hi')");
        let first = s.begin_review().unwrap();
        let second = s.begin_review().unwrap();

        // The newer submission resolves first.
        assert_eq!(
            s.install_result(second, result_with_score(90)),
            SubmitOutcome::Installed
        );
        // The older response arrives late and must not overwrite.
        assert_eq!(
            s.install_result(first, result_with_score(10)),
            SubmitOutcome::Stale
        );
        assert_eq!(s.result().unwrap().overall_score, 90);
    }

    #[test]
    fn installing_a_result_reseeds_the_chat() {
        let mut s = session();
        s.set_code("x = 1");
        let seq = s.begin_review().unwrap();
        s.install_result(seq, result_with_score(40));
        assert_eq!(s.chat().unwrap().conversation().len(), 1);

        let seq = s.begin_review().unwrap();
        s.install_result(seq, result_with_score(95));
        let chat = s.chat().unwrap();
        assert_eq!(chat.conversation().len(), 1);
        assert!(chat.conversation()[0].content.contains("95/100"));
    }

    #[tokio::test]
    async fn send_chat_requires_a_bound_review() {
        let mut s = session();
        s.set_code("x = 1");
        assert_eq!(
            s.send_chat("why?").await.unwrap_err(),
            ChatError::NoReviewBound
        );
    }

    #[tokio::test]
    async fn submit_then_chat_roundtrip() {
        let mut s = session();
        s.set_code("x = 1");
        assert_eq!(s.submit_review().await.unwrap(), SubmitOutcome::Installed);
        let reply = s.send_chat("why this score?").await.unwrap();
        assert_eq!(reply, "reply");
        assert_eq!(s.chat().unwrap().conversation().len(), 3);
    }

    #[test]
    fn apply_improvement_replaces_the_whole_code() {
        let mut s = session();
        // Whitespace drift from the suggestion's current_code is typical
        // of model output and must not matter.
        s.set_code("let b = slow( );\n");
        let suggestion = RefactoringSuggestion {
            line_range: "1".into(),
            description: "d".into(),
            current_code: "let b = slow();".into(),
            improved_code: "let b = fast();".into(),
        };
        s.apply_improvement(&suggestion);
        assert_eq!(s.code(), "let b = fast();");
    }

    #[test]
    fn apply_improvement_is_idempotent() {
        let mut s = session();
        s.set_code("let b = slow();");
        let suggestion = RefactoringSuggestion {
            line_range: String::new(),
            description: "d".into(),
            current_code: "slow()".into(),
            improved_code: "let b = fast();".into(),
        };
        s.apply_improvement(&suggestion);
        s.apply_improvement(&suggestion);
        assert_eq!(s.code(), "let b = fast();");
    }

    #[test]
    fn apply_improvement_ignores_empty_improved_code() {
        let mut s = session();
        s.set_code("let b = slow();");
        let suggestion = RefactoringSuggestion {
            line_range: String::new(),
            description: "d".into(),
            current_code: "slow()".into(),
            improved_code: String::new(),
        };
        s.apply_improvement(&suggestion);
        assert_eq!(s.code(), "let b = slow();");
    }
}

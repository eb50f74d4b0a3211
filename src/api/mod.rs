//! Collaborator API contract and error taxonomy.
//!
//! The review service, chat service and history store are external
//! collaborators reached over HTTP. This module defines the trait the rest
//! of the crate programs against, decoupling session logic from reqwest,
//! plus the error classification shared by every call site.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::chat::OutboundChat;
use crate::models::{HistoryRecord, ReviewResult};

/// Errors from the collaborator API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected before any network call.
    #[error("no code to review")]
    EmptyCode,

    /// The service answered with a non-2xx status.
    #[error("API error {status}: {detail}")]
    Http { status: u16, detail: String },

    /// HTTP 429 or a rate-limit marker in the response detail.
    #[error("rate limited by the review service")]
    RateLimited,

    /// The upstream model is overloaded or unavailable.
    #[error("the AI model is overloaded")]
    Overloaded,

    /// The service answered 2xx but with an empty or unusable body.
    #[error("the AI model returned an empty response")]
    EmptyResponse,

    /// The response body did not validate as a review result.
    #[error(transparent)]
    Malformed(#[from] crate::models::result::ResultError),

    /// Connectivity failure before any response arrived.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// User-facing message for each failure category. Validation and
    /// rate-limit failures get distinct explanations; transient upstream
    /// problems get retry-encouraging wording.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::EmptyCode => "Please enter some code to review".to_string(),
            ApiError::RateLimited => {
                "The review service is rate limited right now. Wait a moment before retrying."
                    .to_string()
            }
            ApiError::Overloaded => {
                "The AI model is temporarily overloaded. Please try again shortly.".to_string()
            }
            ApiError::EmptyResponse => {
                "The AI model returned an empty response. Please try again.".to_string()
            }
            ApiError::Http { detail, .. } if !detail.is_empty() => detail.clone(),
            ApiError::Http { status, .. } => format!("API error: {status}"),
            ApiError::Malformed(e) => e.to_string(),
            ApiError::Transport(_) => "Failed to reach the review service. Please try again."
                .to_string(),
        }
    }
}

/// Classify a non-2xx response into the right error variant.
///
/// Matches the status first, then falls back to substring markers in the
/// server-provided detail text, since some gateways tunnel upstream
/// failures through a generic 500.
pub fn classify_response(status: u16, detail: String) -> ApiError {
    let lower = detail.to_lowercase();
    if status == 429 || lower.contains("rate limit") || lower.contains("too many requests") {
        ApiError::RateLimited
    } else if status == 503
        || lower.contains("unavailable")
        || lower.contains("overloaded")
        || lower.contains("high demand")
    {
        ApiError::Overloaded
    } else if lower.contains("empty response") {
        ApiError::EmptyResponse
    } else {
        ApiError::Http { status, detail }
    }
}

/// Outcome of an email verification attempt. An already-verified reply
/// may carry the server's own explanation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    AlreadyVerified { detail: Option<String> },
}

/// The collaborator API surface consumed by the session layer.
///
/// One method per endpoint of the review service. Implementations handle
/// transport, auth headers and body shapes; callers only see typed
/// results and [`ApiError`].
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// POST /api/review — submit code and get a validated result.
    async fn submit_review(&self, code: &str, language: &str) -> Result<ReviewResult, ApiError>;

    /// POST /api/chat — one follow-up chat turn. Returns the assistant text.
    async fn chat_turn(&self, outbound: &OutboundChat) -> Result<String, ApiError>;

    /// POST /api/history/save — persist a review. Best-effort for callers.
    async fn save_history(
        &self,
        code: &str,
        language: &str,
        result: &ReviewResult,
    ) -> Result<(), ApiError>;

    /// GET /api/history — saved reviews, newest first.
    async fn list_history(&self) -> Result<Vec<HistoryRecord>, ApiError>;

    /// DELETE /api/history — remove all saved reviews.
    async fn clear_history(&self) -> Result<(), ApiError>;

    /// POST /api/auth/resend-verification — best-effort for callers.
    async fn resend_verification(&self) -> Result<(), ApiError>;

    /// GET /api/auth/verify-email?token= — surfaced to the user.
    async fn verify_email(&self, token: &str) -> Result<VerifyOutcome, ApiError>;
}

//! reqwest-based implementation of the collaborator API.
//!
//! All endpoints live under a single configurable base URL. Non-2xx
//! responses carry a `{detail}` JSON body when the server has something
//! to say; that text feeds the error classification in [`super`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::chat::OutboundChat;
use crate::models::{HistoryRecord, ReviewResult};

use super::{classify_response, ApiError, ReviewApi, VerifyOutcome};

/// Timeout for review and chat calls. The upstream model can be slow,
/// so this is deliberately generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the review service.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

/// Body of a successful chat turn.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Body of a verify-email response.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    already_verified: bool,
    #[serde(default)]
    detail: Option<String>,
}

/// Error body shape used by the service for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

impl HttpApi {
    /// Create a client against the given base URL. A trailing slash on
    /// the base URL is tolerated.
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the bearer token when one is configured.
    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Turn a non-2xx response into a classified [`ApiError`], reading
    /// the server's `{detail}` text when present.
    async fn error_from(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let detail = response
            .json::<ErrorBody>()
            .await
            .map(|b| b.detail)
            .unwrap_or_default();
        classify_response(status, detail)
    }
}

#[async_trait]
impl ReviewApi for HttpApi {
    async fn submit_review(&self, code: &str, language: &str) -> Result<ReviewResult, ApiError> {
        if code.trim().is_empty() {
            return Err(ApiError::EmptyCode);
        }

        let response = self
            .client
            .post(self.url("/api/review"))
            .json(&serde_json::json!({ "code": code, "language": language }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: serde_json::Value = response.json().await?;
        Ok(ReviewResult::from_json(body)?)
    }

    async fn chat_turn(&self, outbound: &OutboundChat) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(outbound)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: ChatResponse = response.json().await?;
        if body.response.trim().is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        Ok(body.response)
    }

    async fn save_history(
        &self,
        code: &str,
        language: &str,
        result: &ReviewResult,
    ) -> Result<(), ApiError> {
        let response = self
            .with_auth(self.client.post(self.url("/api/history/save")))
            .json(&serde_json::json!({
                "code": code,
                "language": language,
                "result": result,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn list_history(&self) -> Result<Vec<HistoryRecord>, ApiError> {
        let response = self
            .with_auth(self.client.get(self.url("/api/history")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn clear_history(&self) -> Result<(), ApiError> {
        let response = self
            .with_auth(self.client.delete(self.url("/api/history")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn resend_verification(&self) -> Result<(), ApiError> {
        let response = self
            .with_auth(self.client.post(self.url("/api/auth/resend-verification")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn verify_email(&self, token: &str) -> Result<VerifyOutcome, ApiError> {
        let response = self
            .client
            .get(self.url("/api/auth/verify-email"))
            .query(&[("token", token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: VerifyResponse = response.json().await?;
        Ok(if body.already_verified {
            VerifyOutcome::AlreadyVerified { detail: body.detail }
        } else {
            VerifyOutcome::Verified
        })
    }
}

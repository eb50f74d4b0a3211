//! Share snapshot encoding.
//!
//! A snapshot captures code, language, the current result and a timestamp
//! for external sharing. The token is the URL-safe base64 of the JSON
//! payload, carried in full — earlier revisions truncated the encoding to
//! twelve characters, which made tokens undecodable for any non-trivial
//! payload. `decode` is now the exact inverse of `encode` and rejects
//! truncated or otherwise invalid tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ReviewResult;

/// Errors from share token handling.
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("share token is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("share token payload is not a valid snapshot: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Point-in-time capture of a review for sharing. Not persisted
/// server-side; the token itself carries the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareSnapshot {
    pub code: String,
    pub language: String,
    pub result: Option<ReviewResult>,
    pub timestamp: DateTime<Utc>,
}

impl ShareSnapshot {
    pub fn new(code: impl Into<String>, language: impl Into<String>, result: Option<ReviewResult>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Encode a snapshot into an opaque, self-contained token.
pub fn encode(snapshot: &ShareSnapshot) -> String {
    // Serialization of a plain struct with string fields cannot fail.
    let json = serde_json::to_vec(snapshot).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a token back into the snapshot it carries.
pub fn decode(token: &str) -> Result<ShareSnapshot, ShareError> {
    let bytes = URL_SAFE_NO_PAD.decode(token)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Build the shareable URL for a snapshot token.
pub fn share_url(origin: &str, token: &str) -> String {
    format!("{}/shared/{token}", origin.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn snapshot() -> ShareSnapshot {
        let result = ReviewResult::from_json(json!({
            "overall_score": 77,
            "summary": "Decent code with a few rough edges.",
            "strengths": ["clear naming"],
        }))
        .unwrap();
        ShareSnapshot::new(
            "function calculateTotal(items) {\n  return items.length;\n}",
            "javascript",
            Some(result),
        )
    }

    #[test]
    fn encode_decode_roundtrip() {
        let original = snapshot();
        let token = encode(&original);
        let decoded = decode(&token).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn token_is_url_safe() {
        let token = encode(&snapshot());
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn truncated_legacy_token_does_not_decode() {
        // The old scheme embedded only the first 12 characters of the
        // encoding; such prefixes must fail loudly, not round-trip.
        let token = encode(&snapshot());
        assert!(token.len() > 12);
        let truncated = &token[..12];
        assert!(decode(truncated).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode("not/base64!").is_err());
        // Valid base64 that is not a snapshot payload.
        let bogus = URL_SAFE_NO_PAD.encode(b"{\"code\": 1}");
        assert!(decode(&bogus).is_err());
    }

    #[test]
    fn share_url_embeds_the_full_token() {
        let token = encode(&snapshot());
        let url = share_url("https://codecritic.example/", &token);
        assert_eq!(url, format!("https://codecritic.example/shared/{token}"));
    }

    #[test]
    fn snapshot_without_result_roundtrips() {
        let snap = ShareSnapshot::new("print('hi')", "python", None);
        let decoded = decode(&encode(&snap)).unwrap();
        assert_eq!(decoded.result, None);
        assert_eq!(decoded.language, "python");
    }
}
